//! Cache en mémoire des flux parsés
//!
//! Values are kept for a fixed time after they were written (`time_to_live`)
//! and the number of cached feeds is bounded (`max_capacity`). Eviction and
//! expiry are handled by moka.
//!
//! Concurrent lookups of a key that is being fetched wait for the running
//! fetch instead of starting another one. Failures are handed to every
//! waiter and never cached: the next lookup fetches again.

use crate::error::{Error, Result};
use moka::future::Cache as MokaCache;
use moka::notification::RemovalCause;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Result shared by every waiter of one fetch
pub type SharedResult<V> = std::result::Result<V, Arc<Error>>;

/// Cache from feed URL to a parsed value
#[derive(Clone)]
pub struct FeedCache<V> {
    ttl: Duration,
    max_entries: u64,
    feeds: Arc<MokaCache<String, V>>,
}

impl<V> FeedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache
    ///
    /// # Arguments
    ///
    /// * `ttl` - How long a value stays valid after it was written
    /// * `max_entries` - Maximum number of cached feeds
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let feeds = MokaCache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .eviction_listener(|url: Arc<String>, _, cause| match cause {
                RemovalCause::Size => {
                    tracing::info!(feed_url = %url, "Feed evicted from cache (capacity reached)")
                }
                RemovalCause::Expired => tracing::debug!(feed_url = %url, "Feed cache entry expired"),
                _ => {}
            })
            .build();

        Self {
            ttl,
            max_entries,
            feeds: Arc::new(feeds),
        }
    }

    /// Returns the cached value for `key`, fetching it if needed
    ///
    /// `fetch` is only polled when no valid value is cached and no fetch for
    /// `key` is already running.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> SharedResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let result = self
            .feeds
            .try_get_with(key.to_string(), async move { fetch().await })
            .await;

        if let Err(e) = &result {
            tracing::error!(feed_url = %key, "Feed fetch failed: {}", e);
        }
        result
    }

    /// Returns the cached value without fetching
    pub async fn get_if_present(&self, key: &str) -> Option<V> {
        self.feeds.get(key).await
    }

    /// Purges expired feeds, returning how many were dropped
    pub async fn clean_up(&self) -> u64 {
        let before = self.feeds.entry_count();
        self.feeds.run_pending_tasks().await;
        let after = self.feeds.entry_count();
        let removed = before.saturating_sub(after);
        if removed > 0 {
            tracing::info!(removed, remaining = after, "Feed cache cleaned");
        }
        removed
    }

    /// Drops the cached value for `key`
    pub async fn invalidate(&self, key: &str) -> bool {
        self.feeds.remove(key).await.is_some()
    }

    /// Number of cached feeds, once pending evictions have run
    pub async fn len(&self) -> u64 {
        self.feeds.run_pending_tasks().await;
        self.feeds.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V> std::fmt::Debug for FeedCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedCache")
            .field("ttl", &self.ttl)
            .field("max_entries", &self.max_entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_does_not_refetch() {
        let cache: FeedCache<u32> = FeedCache::new(Duration::from_secs(60), 10);
        let first = cache.get_or_fetch("a", || async { Ok(1) }).await.unwrap();
        let second = cache.get_or_fetch("a", || async { Ok(2) }).await.unwrap();
        assert_eq!((first, second), (1, 1));
        assert_eq!(cache.get_if_present("a").await, Some(1));
        assert_eq!(cache.get_if_present("b").await, None);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let cache: FeedCache<u32> = FeedCache::new(Duration::from_secs(60), 2);
        for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            cache.get_or_fetch(key, || async move { Ok(i as u32) }).await.unwrap();
        }
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache: FeedCache<u32> = FeedCache::new(Duration::from_secs(60), 2);
        cache.get_or_fetch("a", || async { Ok(1) }).await.unwrap();
        assert!(cache.invalidate("a").await);
        assert!(!cache.invalidate("a").await);
        assert_eq!(cache.get_if_present("a").await, None);

        let again = cache.get_or_fetch("a", || async { Ok(2) }).await.unwrap();
        assert_eq!(again, 2);
    }
}
