// Client-side session state passed explicitly to whoever needs it
use crate::feed::WishlistFeed;
use crate::model::FeedError;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, warn};

/// Opaque session token issued by the API. Never inspected or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Known wishlisted product ids plus whether they still match the server.
///
/// A stale snapshot keeps answering from its last known ids until it is
/// refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistSnapshot {
    ids: BTreeSet<i64>,
    freshness: Freshness,
}

impl WishlistSnapshot {
    /// Empty snapshot that has never been synced.
    pub fn stale() -> Self {
        Self {
            ids: BTreeSet::new(),
            freshness: Freshness::Stale,
        }
    }

    pub fn fresh(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            freshness: Freshness::Fresh,
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Records a local add; returns false if the id was already present.
    pub fn insert(&mut self, id: i64) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: i64) -> bool {
        self.ids.remove(&id)
    }

    pub fn mark_stale(&mut self) {
        self.freshness = Freshness::Stale;
    }

    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Replaces the ids wholesale and marks the snapshot fresh.
    pub fn refresh(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.ids = ids.into_iter().collect();
        self.freshness = Freshness::Fresh;
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }
}

impl Default for WishlistSnapshot {
    fn default() -> Self {
        Self::stale()
    }
}

/// Fetches the wishlist and refreshes the snapshot. On failure the snapshot
/// keeps its ids and is marked stale.
pub async fn sync_wishlist<F>(
    feed: &F,
    email: &str,
    snapshot: &mut WishlistSnapshot,
) -> Result<(), FeedError>
where
    F: WishlistFeed + ?Sized,
{
    match feed.wishlist_ids(email).await {
        Ok(ids) => {
            snapshot.refresh(ids);
            info!("Wishlist synced: {} items", snapshot.len());
            Ok(())
        }
        Err(e) => {
            warn!("Wishlist sync failed: {}", e);
            snapshot.mark_stale();
            Err(e)
        }
    }
}
