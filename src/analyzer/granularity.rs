use crate::model::Granularity;
use chrono::{DateTime, Duration, Utc};

/// Spans longer than this are charted weekly instead of daily.
pub const WEEKLY_SPAN_DAYS: i64 = 14;

/// Picks daily or weekly buckets from the observed time span.
///
/// Returns `None` for an empty set; the caller reports "no historical data"
/// instead of bucketing.
pub fn select_granularity(timestamps: &[DateTime<Utc>]) -> Option<Granularity> {
    let earliest = timestamps.iter().min()?;
    let latest = timestamps.iter().max()?;
    if *latest - *earliest > Duration::days(WEEKLY_SPAN_DAYS) {
        Some(Granularity::Week)
    } else {
        Some(Granularity::Day)
    }
}

/// An explicit hour/day/week choice wins; otherwise select from the span.
pub fn resolve_granularity(
    explicit: Option<Granularity>,
    timestamps: &[DateTime<Utc>],
) -> Option<Granularity> {
    if timestamps.is_empty() {
        return None;
    }
    explicit.or_else(|| select_granularity(timestamps))
}
