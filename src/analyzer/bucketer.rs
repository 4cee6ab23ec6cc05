//! Time bucketing of history observations into per-store trend series.
//!
//! Bucket starts are computed on a caller-supplied clock (`chrono::TimeZone`)
//! and reported back as UTC instants:
//! - hour: start of the clock hour
//! - day: local midnight
//! - week: local midnight of the ISO Monday (Sunday belongs to the week before)

use crate::model::{Bucket, Granularity, PriceObservation, TrendPoint};
use crate::normalizer::is_valid_price;
use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike, Utc};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Trend points per store. Stores keep first-encounter order; points are
/// sorted by bucket start. Equality ignores store order.
pub type TrendSeries = IndexMap<String, Vec<TrendPoint>>;

/// Start of the bucket containing `ts` on the given clock.
pub fn bucket_start<Tz: TimeZone>(
    ts: DateTime<Utc>,
    granularity: Granularity,
    clock: &Tz,
) -> DateTime<Utc> {
    let local = ts.with_timezone(clock).naive_local();
    let midnight = local.date().and_time(NaiveTime::MIN);
    let floored = match granularity {
        Granularity::Hour => midnight + Duration::hours(local.hour() as i64),
        Granularity::Day => midnight,
        Granularity::Week => {
            let back = local.weekday().num_days_from_monday() as i64;
            midnight - Duration::days(back)
        }
    };

    match clock.from_local_datetime(&floored).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Local midnight skipped by a DST change; keep the key deterministic.
        None => floored.and_utc(),
    }
}

/// Groups valid observations into buckets keyed by `(store, bucket start)`.
///
/// Buckets come out grouped by store in first-encounter order and sorted by
/// start within a store. Prices inside a bucket are ordered by timestamp
/// (then value), so the result does not depend on input order.
pub fn collect_buckets<Tz: TimeZone>(
    observations: &[PriceObservation],
    granularity: Granularity,
    clock: &Tz,
) -> Vec<Bucket> {
    let mut stores: IndexMap<&str, BTreeMap<DateTime<Utc>, Vec<(DateTime<Utc>, f64)>>> =
        IndexMap::new();

    for obs in observations {
        if !is_valid_price(obs.price) {
            debug!(
                "Skipping observation {} @ {} with price {}",
                obs.store, obs.timestamp, obs.price
            );
            continue;
        }
        let start = bucket_start(obs.timestamp, granularity, clock);
        stores
            .entry(obs.store.as_str())
            .or_default()
            .entry(start)
            .or_default()
            .push((obs.timestamp, obs.price));
    }

    stores
        .into_iter()
        .flat_map(|(store, buckets)| {
            buckets.into_iter().map(move |(start, mut readings)| {
                readings.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
                Bucket {
                    store: store.to_string(),
                    start,
                    prices: readings.into_iter().map(|(_, price)| price).collect(),
                }
            })
        })
        .collect()
}

/// One trend point per non-empty bucket, per store, sorted by time.
/// Gaps between buckets stay gaps.
pub fn bucket_series<Tz: TimeZone>(
    observations: &[PriceObservation],
    granularity: Granularity,
    clock: &Tz,
) -> TrendSeries {
    let mut series = TrendSeries::new();
    for bucket in collect_buckets(observations, granularity, clock) {
        let point = bucket.trend_point();
        series.entry(bucket.store).or_default().push(point);
    }
    series
}
