use crate::analyzer::bucketer::{bucket_series, TrendSeries};
use crate::analyzer::granularity::resolve_granularity;
use crate::analyzer::insight::{best_time_to_buy, FEED_ERROR_INSIGHT, NO_HISTORY_INSIGHT};
use crate::analyzer::live_stats::compute_live_stats;
use crate::analyzer::store_aggregator::{aggregate_by_store, best_price};
use crate::model::{
    FeedError, Granularity, HistoryReport, HistorySummary, LiveListing, LiveStats, StabilityLabel,
};
use crate::normalizer::listing_prices;
use crate::utils::format_inr;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const UNAVAILABLE: &str = "N/A";
const FAILED: &str = "Error";

/// What the history feed returned for a query.
#[derive(Debug, Clone, Copy)]
pub enum HistoryOutcome<'a> {
    Report(&'a HistoryReport),
    /// The feed answered but has no history for the query yet.
    NoHistory,
    /// The feed could not be read.
    Failed(&'a FeedError),
}

impl<'a> From<Option<&'a HistoryReport>> for HistoryOutcome<'a> {
    fn from(history: Option<&'a HistoryReport>) -> Self {
        match history {
            Some(report) => HistoryOutcome::Report(report),
            None => HistoryOutcome::NoHistory,
        }
    }
}

impl<'a> From<&'a Result<Option<HistoryReport>, FeedError>> for HistoryOutcome<'a> {
    fn from(result: &'a Result<Option<HistoryReport>, FeedError>) -> Self {
        match result {
            Ok(history) => history.as_ref().into(),
            Err(e) => HistoryOutcome::Failed(e),
        }
    }
}

/// Where the four summary cards get their numbers from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SummaryCards {
    /// Pre-computed by the history feed.
    History {
        summary: HistorySummary,
        stability: StabilityLabel,
    },
    /// No history yet: computed from the current search results.
    Live(LiveStats),
    Unavailable,
    /// The history feed failed; carries the error message.
    Error(String),
}

impl SummaryCards {
    /// (card, text) pairs: lowest price, average price, price range, stability.
    pub fn render(&self) -> [(&'static str, String); 4] {
        match self {
            SummaryCards::History { summary, stability } => [
                ("lowest", format_inr(summary.lowest_price)),
                ("average", format_inr(summary.average_price)),
                ("range", summary.price_range.clone()),
                ("stability", stability.badge().to_string()),
            ],
            SummaryCards::Live(stats) => [
                ("lowest", format_inr(stats.min)),
                ("average", format_inr(stats.mean as f64)),
                ("range", format!("{} - {}", format_inr(stats.min), format_inr(stats.max))),
                ("stability", stats.stability.badge().to_string()),
            ],
            SummaryCards::Unavailable => Self::filled(UNAVAILABLE),
            SummaryCards::Error(_) => Self::filled(FAILED),
        }
    }

    fn filled(text: &str) -> [(&'static str, String); 4] {
        [
            ("lowest", text.to_string()),
            ("average", text.to_string()),
            ("range", text.to_string()),
            ("stability", text.to_string()),
        ]
    }
}

/// Line chart input: one series per store at a single granularity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub granularity: Granularity,
    pub series: TrendSeries,
}

impl TrendChart {
    /// Earliest and latest bucket start across all stores.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut xs = self.series.values().flatten().map(|p| p.x);
        let first = xs.next()?;
        Some(xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }

    pub fn point_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}

/// Everything the analytics tab shows for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsView {
    pub summary: SummaryCards,
    /// Lowest current price per store.
    pub store_chart: BTreeMap<String, f64>,
    /// Cheapest current offer across all stores.
    pub best_price: Option<f64>,
    /// `None` when there is no usable history.
    pub trend: Option<TrendChart>,
    pub insight: String,
}

impl AnalyticsView {
    /// Assembles the view from the history feed's outcome and the current
    /// listings. Without usable history the cards fall back to live
    /// statistics and no trend chart is produced. A failed feed shows error
    /// cards instead; the store chart is still built from the listings.
    pub fn build<Tz: TimeZone>(
        history: HistoryOutcome<'_>,
        listings: &[LiveListing],
        granularity: Option<Granularity>,
        clock: &Tz,
    ) -> Self {
        let store_chart = aggregate_by_store(listings);
        let best_price = best_price(listings);

        let report = match history {
            HistoryOutcome::Report(report) if !report.observations.is_empty() => report,
            HistoryOutcome::Report(_) | HistoryOutcome::NoHistory => {
                return Self::live_fallback(listings, store_chart, best_price);
            }
            HistoryOutcome::Failed(e) => {
                return Self {
                    summary: SummaryCards::Error(e.to_string()),
                    store_chart,
                    best_price,
                    trend: None,
                    insight: FEED_ERROR_INSIGHT.to_string(),
                };
            }
        };

        let timestamps: Vec<DateTime<Utc>> =
            report.observations.iter().map(|o| o.timestamp).collect();
        let trend = resolve_granularity(granularity, &timestamps).and_then(|granularity| {
            let series = bucket_series(&report.observations, granularity, clock);
            (!series.is_empty()).then_some(TrendChart { granularity, series })
        });

        let insight = report
            .best_time_to_buy
            .clone()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| best_time_to_buy(&report.observations));

        Self {
            summary: SummaryCards::History {
                summary: report.summary.clone(),
                stability: report.stability,
            },
            store_chart,
            best_price,
            trend,
            insight,
        }
    }

    fn live_fallback(
        listings: &[LiveListing],
        store_chart: BTreeMap<String, f64>,
        best_price: Option<f64>,
    ) -> Self {
        let summary = match compute_live_stats(&listing_prices(listings)) {
            Some(stats) => SummaryCards::Live(stats),
            None => SummaryCards::Unavailable,
        };
        Self {
            summary,
            store_chart,
            best_price,
            trend: None,
            insight: NO_HISTORY_INSIGHT.to_string(),
        }
    }

    pub fn has_history(&self) -> bool {
        matches!(self.summary, SummaryCards::History { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self.summary, SummaryCards::Error(_))
    }
}
