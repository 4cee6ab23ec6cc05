// Analyzer module: turns fetched feeds into the analytics view.

pub mod bucketer;
pub mod granularity;
pub mod insight;
pub mod live_stats;
pub mod store_aggregator;
pub mod view;

pub use bucketer::{bucket_series, TrendSeries};
pub use granularity::select_granularity;
pub use insight::best_time_to_buy;
pub use live_stats::compute_live_stats;
pub use store_aggregator::aggregate_by_store;
pub use view::{AnalyticsView, HistoryOutcome, SummaryCards, TrendChart};

use crate::model::{Granularity, LiveListing};
use chrono::TimeZone;

/// Holds the clock used for day/week boundaries and an optional fixed
/// granularity, and builds views with them.
pub struct Analyzer<Tz: TimeZone> {
    clock: Tz,
    granularity: Option<Granularity>,
}

impl<Tz: TimeZone> Analyzer<Tz> {
    pub fn new(clock: Tz) -> Self {
        Self {
            clock,
            granularity: None,
        }
    }

    /// Always bucket at `granularity` instead of choosing from the span.
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = Some(granularity);
        self
    }

    pub fn analyze(&self, history: HistoryOutcome<'_>, listings: &[LiveListing]) -> AnalyticsView {
        self.analyze_with(history, listings, self.granularity)
    }

    /// Like [`analyze`](Self::analyze) with a per-call granularity override.
    pub fn analyze_with(
        &self,
        history: HistoryOutcome<'_>,
        listings: &[LiveListing],
        granularity: Option<Granularity>,
    ) -> AnalyticsView {
        AnalyticsView::build(history, listings, granularity.or(self.granularity), &self.clock)
    }
}
