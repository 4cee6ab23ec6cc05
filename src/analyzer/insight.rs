use crate::analyzer::bucketer::bucket_start;
use crate::model::{Granularity, PriceObservation};
use crate::normalizer::is_valid_price;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Shown when there is no history to derive a recommendation from.
pub const NO_HISTORY_INSIGHT: &str = "Search more times to build trend insights.";

/// Shown when the history feed failed.
pub const FEED_ERROR_INSIGHT: &str = "Unable to load analytics data.";

pub const SINGLE_EVENT_INSIGHT: &str =
    "Only one search event found — search again later to see price movement";

/// Best price of each search event. Searches are grouped into one-hour
/// windows (UTC), ordered by time.
pub fn event_minimums(observations: &[PriceObservation]) -> Vec<(DateTime<Utc>, f64)> {
    let mut events: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();
    for obs in observations.iter().filter(|o| is_valid_price(o.price)) {
        let event = bucket_start(obs.timestamp, Granularity::Hour, &Utc);
        events
            .entry(event)
            .and_modify(|best| *best = best.min(obs.price))
            .or_insert(obs.price);
    }
    events.into_iter().collect()
}

/// Compares the best price of the latest search event with the earliest one.
pub fn best_time_to_buy(observations: &[PriceObservation]) -> String {
    let events = event_minimums(observations);
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return NO_HISTORY_INSIGHT.to_string();
    };
    if events.len() < 2 {
        return SINGLE_EVENT_INSIGHT.to_string();
    }

    let diff = last.1 as i64 - first.1 as i64;
    if diff < 0 {
        format!(
            "Prices have dropped by ₹{} since your first search! Good time to buy.",
            diff.abs()
        )
    } else if diff > 0 {
        format!("Prices have increased by ₹{} since your first search.", diff)
    } else {
        "Prices are currently equal to the earliest recorded price.".to_string()
    }
}
