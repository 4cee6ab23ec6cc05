use chrono::FixedOffset;
use futures::future::join_all;
use pricenest::config::{load_config, AppConfig, QueryConfig};
use pricenest::normalizer::{normalize_all, retain_valid_observations};
use pricenest::session::sync_wishlist;
use pricenest::utils::format_inr;
use pricenest::{
    AnalyticsView, Analyzer, ApiClient, HistoryFeed, HistoryOutcome, SearchFeed, SessionToken,
    WishlistSnapshot,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: Arc<AppConfig> = match load_config(&config_path) {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return;
        }
    };

    let clock = match config.clock() {
        Ok(clock) => clock,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };
    let mut analyzer = Analyzer::new(clock);
    if let Some(granularity) = config.granularity {
        analyzer = analyzer.with_granularity(granularity);
    }

    let client = match ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_seconds),
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            return;
        }
    };
    let client = match &config.session_token {
        Some(token) => client.with_session(SessionToken::new(token.clone())),
        None => client,
    };

    let mut wishlist = WishlistSnapshot::stale();

    loop {
        info!("Refreshing analytics for {} queries...", config.queries.len());

        if let Some(email) = &config.email {
            if let Err(e) = sync_wishlist(&client, email, &mut wishlist).await {
                warn!("Using stale wishlist ({} items): {}", wishlist.len(), e);
            }
        }

        let tasks: Vec<_> = config
            .queries
            .iter()
            .map(|query_cfg| process_query(query_cfg, &client, &analyzer, &wishlist))
            .collect();
        join_all(tasks).await;

        info!(
            "Waiting {}s for the next refresh (Ctrl-C to stop)...",
            config.check_interval_seconds
        );
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }
}

/// Fetches both feeds for one query, builds the analytics view and logs it.
async fn process_query(
    query_cfg: &QueryConfig,
    client: &ApiClient,
    analyzer: &Analyzer<FixedOffset>,
    wishlist: &WishlistSnapshot,
) {
    let query = query_cfg.search_term();
    info!("Processing query: {}", query);

    let (listings, mut history) = tokio::join!(client.search(query), client.history(query));

    let mut listings = match listings {
        Ok(listings) => listings,
        Err(e) => {
            warn!("Search feed error for '{}': {}", query, e);
            Vec::new()
        }
    };
    normalize_all(&mut listings);

    match history.as_mut() {
        Ok(Some(report)) => retain_valid_observations(&mut report.observations),
        Ok(None) => {}
        Err(e) => warn!("History feed error for '{}': {}", query, e),
    }

    let wishlisted = listings
        .iter()
        .filter_map(|l| l.id)
        .filter(|id| wishlist.contains(*id))
        .count();
    if wishlisted > 0 {
        info!("{} of {} listings are on the wishlist", wishlisted, listings.len());
    }

    let view = analyzer.analyze_with(
        HistoryOutcome::from(&history),
        &listings,
        query_cfg.granularity,
    );
    log_view(query, &view);
}

fn log_view(query: &str, view: &AnalyticsView) {
    if view.is_error() {
        warn!("[{}] Analytics unavailable, history feed failed.", query);
    } else if !view.has_history() {
        info!("[{}] No historical data available yet. Showing current search prices.", query);
    }
    for (card, text) in view.summary.render() {
        info!("[{}] {}: {}", query, card, text);
    }

    for (store, price) in &view.store_chart {
        info!("[{}] store {}: {:.2}", query, store, price);
    }
    if let Some(price) = view.best_price {
        info!("[{}] best price: {}", query, format_inr(price));
    }

    match &view.trend {
        Some(trend) => {
            info!(
                "[{}] trend: {} stores, {} points, per {}",
                query,
                trend.series.len(),
                trend.point_count(),
                trend.granularity
            );
            if let Some((first, last)) = trend.time_span() {
                info!("[{}] trend span: {} .. {}", query, first, last);
            }
        }
        None => info!("[{}] No price history yet, search again later to build a trend.", query),
    }

    info!("[{}] insight: {}", query, view.insight);
}
