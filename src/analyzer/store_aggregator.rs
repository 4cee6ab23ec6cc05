use crate::model::LiveListing;
use std::collections::BTreeMap;

/// Lowest valid price per store, for the store comparison chart.
///
/// Listings without a usable price are skipped, so a store is only present
/// once at least one of its listings has one. Keyed by store name, so the
/// result depends only on the (store, price) pairs, not their order.
pub fn aggregate_by_store(listings: &[LiveListing]) -> BTreeMap<String, f64> {
    let mut lowest: BTreeMap<String, f64> = BTreeMap::new();
    for listing in listings {
        let Some(price) = listing.valid_price() else {
            continue;
        };
        lowest
            .entry(listing.store.clone())
            .and_modify(|current| *current = current.min(price))
            .or_insert(price);
    }
    lowest
}

/// Cheapest valid price across all listings.
pub fn best_price(listings: &[LiveListing]) -> Option<f64> {
    listings
        .iter()
        .filter_map(LiveListing::valid_price)
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(store: &str, price: Option<f64>) -> LiveListing {
        LiveListing {
            id: None,
            title: String::new(),
            store: store.into(),
            price,
            link: String::new(),
            image: None,
        }
    }

    #[test]
    fn zero_price_never_wins() {
        let listings = vec![
            listing("A", Some(300.0)),
            listing("A", Some(0.0)),
            listing("B", Some(150.0)),
        ];
        let map = aggregate_by_store(&listings);
        assert_eq!(map.len(), 2);
        assert_eq!(map["A"], 300.0);
        assert_eq!(map["B"], 150.0);
        assert_eq!(best_price(&listings), Some(150.0));
    }

    #[test]
    fn store_with_unknown_price_first_still_counts_later_price() {
        let listings = vec![listing("A", None), listing("A", Some(250.0)), listing("C", None)];
        let map = aggregate_by_store(&listings);
        assert_eq!(map.get("A"), Some(&250.0));
        assert!(!map.contains_key("C"));
    }
}
