//! Analytics core of the pricenest price-comparison client.
//!
//! Takes the live search feed and the price history feed, and prepares what
//! the results page shows: per-store trend series bucketed by hour, day or
//! week, live price statistics with a stability label, the cheapest offer
//! per store and a buy recommendation.

pub mod analyzer;
pub mod config;
pub mod feed;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod session;
pub mod utils;

pub use analyzer::{
    aggregate_by_store, best_time_to_buy, bucket_series, compute_live_stats, select_granularity,
    AnalyticsView, Analyzer, HistoryOutcome, SummaryCards, TrendChart, TrendSeries,
};
pub use feed::{ApiClient, HistoryFeed, SearchFeed, WishlistFeed};
pub use model::{
    FeedError, Granularity, HistoryReport, HistorySummary, LiveListing, LiveStats, ParserError,
    PriceObservation, StabilityLabel, TrendPoint,
};
pub use session::{SessionToken, WishlistSnapshot};
