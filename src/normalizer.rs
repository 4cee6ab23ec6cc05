use crate::model::{LiveListing, PriceObservation};
use tracing::debug;

/// A price takes part in aggregates only when it is finite and positive.
/// Zero means "unknown" in the search feed.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Valid prices of the given listings, in listing order.
pub fn listing_prices(listings: &[LiveListing]) -> Vec<f64> {
    listings.iter().filter_map(LiveListing::valid_price).collect()
}

pub fn normalize_all(listings: &mut Vec<LiveListing>) {
    for listing in listings.iter_mut() {
        normalize_listing(listing);
    }
}

fn normalize_listing(listing: &mut LiveListing) {
    let store = listing.store.trim();
    if store.len() != listing.store.len() {
        listing.store = store.to_string();
    }

    if let Some(price) = listing.price {
        if !is_valid_price(price) {
            debug!("Dropping unusable price {} for '{}'", price, listing.title);
            listing.price = None;
        }
    }
}

/// Drops observations whose price cannot take part in aggregates.
pub fn retain_valid_observations(observations: &mut Vec<PriceObservation>) {
    let before = observations.len();
    observations.retain(|o| is_valid_price(o.price));
    let dropped = before - observations.len();
    if dropped > 0 {
        debug!("Dropped {} history observations with invalid prices", dropped);
    }
}
