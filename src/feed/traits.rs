use crate::model::{FeedError, HistoryReport, LiveListing};

/// Current offers for a query.
#[async_trait::async_trait]
pub trait SearchFeed: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<LiveListing>, FeedError>;
}

/// Price history for a query. `Ok(None)` means no history has been
/// recorded yet.
#[async_trait::async_trait]
pub trait HistoryFeed: Send + Sync {
    async fn history(&self, query: &str) -> Result<Option<HistoryReport>, FeedError>;
}

/// Product ids on a user's wishlist.
#[async_trait::async_trait]
pub trait WishlistFeed: Send + Sync {
    async fn wishlist_ids(&self, email: &str) -> Result<Vec<i64>, FeedError>;
}
