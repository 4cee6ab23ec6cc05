//! Assembly of the analytics view from history and live listings.

mod common;

use chrono::{FixedOffset, Utc};
use common::{listing, obs, sample_history, ts};
use pricenest::analyzer::insight::{FEED_ERROR_INSIGHT, NO_HISTORY_INSIGHT};
use pricenest::{
    AnalyticsView, Analyzer, FeedError, Granularity, HistoryOutcome, HistoryReport,
    HistorySummary, StabilityLabel, SummaryCards,
};

fn report(
    observations: Vec<pricenest::PriceObservation>,
    insight: Option<&str>,
) -> HistoryReport {
    HistoryReport {
        summary: HistorySummary {
            lowest_price: 940.0,
            highest_price: Some(1001.0),
            average_price: 973.0,
            price_range: "₹940 – ₹1001".to_string(),
            cheapest_store: Some("Amazon".to_string()),
        },
        observations,
        stability: StabilityLabel::Stable,
        best_time_to_buy: insight.map(str::to_string),
    }
}

fn live() -> Vec<pricenest::LiveListing> {
    vec![
        listing(1, "Amazon", Some(100.0)),
        listing(2, "Flipkart", Some(200.0)),
        listing(3, "Flipkart", Some(0.0)),
        listing(4, "Croma", Some(300.0)),
    ]
}

#[test]
fn no_history_falls_back_to_live_stats() {
    let view = AnalyticsView::build(HistoryOutcome::NoHistory, &live(), None, &Utc);

    assert!(!view.has_history());
    assert!(view.trend.is_none());
    assert_eq!(view.insight, NO_HISTORY_INSIGHT);
    assert_eq!(view.store_chart.len(), 3);
    assert_eq!(view.best_price, Some(100.0));
    match &view.summary {
        SummaryCards::Live(stats) => {
            assert_eq!(stats.mean, 200);
            assert_eq!(stats.stability, StabilityLabel::Volatile);
        }
        other => panic!("expected live stats, got {:?}", other),
    }

    let cards = view.summary.render();
    assert_eq!(cards[0], ("lowest", "₹100".to_string()));
    assert_eq!(cards[2], ("range", "₹100 - ₹300".to_string()));
    assert_eq!(cards[3], ("stability", "🔴 Highly Volatile".to_string()));
}

#[test]
fn history_without_observations_is_no_history() {
    let empty = report(Vec::new(), None);
    let view = AnalyticsView::build(HistoryOutcome::Report(&empty), &live(), None, &Utc);
    assert!(!view.has_history());
}

#[test]
fn failed_history_feed_shows_error_not_live_fallback() {
    let err = FeedError::Status {
        status: 503,
        detail: "Analytics service temporarily unavailable".to_string(),
    };
    let view = AnalyticsView::build(HistoryOutcome::Failed(&err), &live(), None, &Utc);

    assert!(view.is_error());
    assert!(!view.has_history());
    assert!(view.trend.is_none());
    assert_eq!(view.insight, FEED_ERROR_INSIGHT);
    assert_eq!(
        view.summary,
        SummaryCards::Error("API error 503: Analytics service temporarily unavailable".to_string())
    );
    assert!(view.summary.render().iter().all(|(_, text)| text == "Error"));

    // live listings still feed the store chart
    assert_eq!(view.store_chart.len(), 3);
    assert_eq!(view.best_price, Some(100.0));
}

#[test]
fn feed_results_map_to_outcomes() {
    let missing: Result<Option<HistoryReport>, FeedError> = Ok(None);
    assert!(matches!(HistoryOutcome::from(&missing), HistoryOutcome::NoHistory));

    let found: Result<Option<HistoryReport>, FeedError> = Ok(Some(report(sample_history(), None)));
    assert!(matches!(HistoryOutcome::from(&found), HistoryOutcome::Report(_)));

    let failed: Result<Option<HistoryReport>, FeedError> = Err(FeedError::Status {
        status: 500,
        detail: "boom".to_string(),
    });
    assert!(matches!(HistoryOutcome::from(&failed), HistoryOutcome::Failed(_)));
}

#[test]
fn no_prices_at_all_shows_unavailable() {
    let listings = vec![listing(1, "Amazon", None), listing(2, "Croma", Some(0.0))];
    let view = AnalyticsView::build(HistoryOutcome::NoHistory, &listings, None, &Utc);
    assert_eq!(view.summary, SummaryCards::Unavailable);
    assert!(view.store_chart.is_empty());
    assert_eq!(view.best_price, None);
    assert!(view.summary.render().iter().all(|(_, text)| text == "N/A"));
}

#[test]
fn history_uses_feed_summary_and_trend() {
    let history = report(sample_history(), Some("Prices remained stable in the last 7 days"));
    let view = AnalyticsView::build(HistoryOutcome::Report(&history), &live(), None, &Utc);

    assert!(view.has_history());
    assert_eq!(view.insight, "Prices remained stable in the last 7 days");
    assert_eq!(view.store_chart["Flipkart"], 200.0);
    assert_eq!(view.best_price, Some(100.0));

    let trend = view.trend.as_ref().unwrap();
    // Jan 1 .. Jan 10 is within fourteen days
    assert_eq!(trend.granularity, Granularity::Day);
    assert_eq!(trend.series.len(), 2);
    assert_eq!(trend.point_count(), 7);
    assert_eq!(trend.time_span(), Some((ts(2024, 1, 1, 0), ts(2024, 1, 10, 0))));

    let cards = view.summary.render();
    assert_eq!(cards[1], ("average", "₹973".to_string()));
    assert_eq!(cards[2], ("range", "₹940 – ₹1001".to_string()));
    assert_eq!(cards[3], ("stability", "🟢 Stable".to_string()));
}

#[test]
fn long_history_switches_to_weekly() {
    let history = report(
        vec![
            obs("Amazon", ts(2024, 1, 1, 9), 1000.0),
            obs("Amazon", ts(2024, 2, 1, 9), 900.0),
        ],
        None,
    );
    let view = AnalyticsView::build(HistoryOutcome::Report(&history), &[], None, &Utc);
    let trend = view.trend.unwrap();
    assert_eq!(trend.granularity, Granularity::Week);
    // Feb 1 2024 is a Thursday
    assert_eq!(trend.series["Amazon"][1].x, ts(2024, 1, 29, 0));
}

#[test]
fn missing_feed_insight_is_derived_locally() {
    let history = report(
        vec![
            obs("Amazon", ts(2024, 1, 1, 9), 1000.0),
            obs("Flipkart", ts(2024, 1, 5, 9), 900.0),
        ],
        Some("  "),
    );
    let view = AnalyticsView::build(HistoryOutcome::Report(&history), &[], None, &Utc);
    assert_eq!(
        view.insight,
        "Prices have dropped by ₹100 since your first search! Good time to buy."
    );
}

#[test]
fn analyzer_applies_clock_and_overrides() {
    let history = report(sample_history(), None);
    let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();

    let analyzer = Analyzer::new(ist).with_granularity(Granularity::Week);
    let weekly = analyzer.analyze(HistoryOutcome::Report(&history), &[]);
    assert_eq!(weekly.trend.as_ref().unwrap().granularity, Granularity::Week);

    let hourly =
        analyzer.analyze_with(HistoryOutcome::Report(&history), &[], Some(Granularity::Hour));
    assert_eq!(hourly.trend.as_ref().unwrap().granularity, Granularity::Hour);

    // Jan 7 23:00 UTC is Monday Jan 8 in IST, so it opens a new local week.
    let series = &weekly.trend.unwrap().series;
    let amazon_weeks: Vec<_> = series["Amazon"].iter().map(|p| p.x).collect();
    assert_eq!(amazon_weeks.len(), 2);
    assert_eq!(amazon_weeks[1], ts(2024, 1, 7, 18) + chrono::Duration::minutes(30));
}
