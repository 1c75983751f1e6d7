//! Podcast feed cache
//!
//! Wraps [`pmopodcast::FeedCache`] with the media index side effects:
//! when a feed is (re)loaded the podcast's previous children are dropped
//! from the index and every playable enclosure gets a fresh id.

use crate::config_ext::MediaConfigExt;
use crate::error::Result;
use crate::index::{IndexEntry, MediaIndex};
use crate::mime::MimeType;
use crate::node::{PodcastEntryNode, PodcastNode};
use pmoconfig::Config;
use pmopodcast::{FeedCache, FeedEntry, FeedFetcher, PodcastClient};
use std::sync::Arc;
use std::time::Duration;

pub type PodcastEntries = Arc<Vec<PodcastEntryNode>>;

/// Time and size bounded cache from feed URL to podcast entries
pub struct PodcastFeedCache {
    cache: FeedCache<PodcastEntries>,
    fetcher: Arc<dyn FeedFetcher>,
    index: Arc<MediaIndex>,
}

impl PodcastFeedCache {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        index: Arc<MediaIndex>,
        ttl: Duration,
        max_entries: u64,
    ) -> Self {
        Self {
            cache: FeedCache::new(ttl, max_entries),
            fetcher,
            index,
        }
    }

    /// Builds the cache and its HTTP client from the configuration
    pub fn from_config(config: &Config, index: Arc<MediaIndex>) -> Result<Self> {
        let timeout = Duration::from_secs(config.get_podcast_fetch_timeout_secs()?);
        let ttl = Duration::from_secs(config.get_podcast_cache_expire_hours()? * 3600);
        let max_entries = config.get_podcast_cache_max_elements()?;

        let client = PodcastClient::builder().timeout(timeout).build()?;
        tracing::debug!(?ttl, max_entries, ?timeout, "Podcast feed cache configured");
        Ok(Self::new(Arc::new(client), index, ttl, max_entries))
    }

    /// Returns the entries of a podcast, fetching its feed when not cached
    ///
    /// Concurrent calls for the same feed share one fetch. Failures are not
    /// cached.
    pub async fn get(&self, podcast: &PodcastNode, prepend_name: bool) -> Result<PodcastEntries> {
        let fetcher = self.fetcher.clone();
        let index = self.index.clone();
        let podcast = podcast.clone();
        let url = podcast.url.clone();

        let entries = self
            .cache
            .get_or_fetch(&url, move || async move {
                let feed = fetcher.fetch_feed(&podcast.url).await?;
                Ok::<_, pmopodcast::Error>(Arc::new(register_entries(
                    &index,
                    &podcast,
                    feed,
                    prepend_name,
                )))
            })
            .await?;
        Ok(entries)
    }

    /// Looks up an entry in the cached feed, without fetching
    pub async fn cached_entry(&self, feed_url: &str, entry_id: &str) -> Option<PodcastEntryNode> {
        self.cache
            .get_if_present(feed_url)
            .await?
            .iter()
            .find(|entry| entry.id == entry_id)
            .cloned()
    }

    /// Purges expired feeds
    pub async fn clean_up(&self) -> u64 {
        self.cache.clean_up().await
    }

    pub async fn invalidate(&self, feed_url: &str) -> bool {
        self.cache.invalidate(feed_url).await
    }

    pub async fn len(&self) -> u64 {
        self.cache.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.is_empty().await
    }
}

impl std::fmt::Debug for PodcastFeedCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodcastFeedCache")
            .field("cache", &self.cache)
            .finish()
    }
}

/// Replaces the podcast's children in the index by the fetched entries
fn register_entries(
    index: &MediaIndex,
    podcast: &PodcastNode,
    feed: Vec<FeedEntry>,
    prepend_name: bool,
) -> Vec<PodcastEntryNode> {
    let removed = index.remove_children(&podcast.id);

    let mut nodes = Vec::with_capacity(feed.len());
    for entry in feed {
        let Some(mime_type) = entry.mime_type.as_deref().and_then(MimeType::parse) else {
            continue;
        };
        let Some(media_type) = mime_type.category().filter(|c| c.is_media()) else {
            continue;
        };

        let name = if prepend_name {
            format!("{} - {}", podcast.name, entry.title)
        } else {
            entry.title
        };
        let id = index.add_unique(
            IndexEntry::new(&podcast.id, media_type, &entry.url)
                .named(&name)
                .with_mime_type(mime_type.as_str())
                .ephemeral(),
        );
        nodes.push(PodcastEntryNode {
            id,
            parent_id: podcast.id.clone(),
            name,
            url: entry.url,
            mime_type,
            duration: entry.duration,
            icon_url: entry.icon_url,
            published: entry.published,
        });
    }

    tracing::info!(
        podcast_id = %podcast.id,
        feed_url = %podcast.url,
        entries = nodes.len(),
        replaced = removed,
        "Podcast feed loaded"
    );
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media_type::MediaType;
    use async_trait::async_trait;

    struct StaticFetcher(Vec<FeedEntry>);

    #[async_trait]
    impl FeedFetcher for StaticFetcher {
        async fn fetch_feed(&self, _url: &str) -> pmopodcast::Result<Vec<FeedEntry>> {
            Ok(self.0.clone())
        }
    }

    fn enclosure(title: &str, url: &str, mime: Option<&str>) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            url: url.to_string(),
            mime_type: mime.map(str::to_string),
            ..Default::default()
        }
    }

    fn podcast() -> PodcastNode {
        PodcastNode {
            id: "p1".to_string(),
            parent_id: "4_PODCASTS".to_string(),
            name: "News".to_string(),
            url: "http://example.com/rss".to_string(),
        }
    }

    #[tokio::test]
    async fn test_only_media_enclosures_are_kept() {
        let index = Arc::new(MediaIndex::new());
        let fetcher = Arc::new(StaticFetcher(vec![
            enclosure("Audio", "http://example.com/1.mp3", Some("audio/mpeg")),
            enclosure("Video", "http://example.com/1.mp4", Some("video/mp4")),
            enclosure("Doc", "http://example.com/1.pdf", Some("application/pdf")),
            enclosure("Untyped", "http://example.com/2.mp3", None),
        ]));
        let cache = PodcastFeedCache::new(fetcher, index.clone(), Duration::from_secs(60), 10);

        let entries = cache.get(&podcast(), true).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "News - Audio");
        assert_eq!(entries[1].mime_type.as_str(), "video/mp4");

        let stored = index.get(&entries[0].id).unwrap();
        assert_eq!(stored.parent_id, "p1");
        assert_eq!(stored.media_type, MediaType::Audio);
        assert_eq!(stored.mime_type.as_deref(), Some("audio/mpeg"));
        assert!(stored.ephemeral);

        assert_eq!(
            cache.cached_entry("http://example.com/rss", &entries[1].id).await,
            Some(entries[1].clone())
        );
    }

    #[tokio::test]
    async fn test_reload_replaces_previous_children() {
        let index = Arc::new(MediaIndex::new());
        let fetcher = Arc::new(StaticFetcher(vec![enclosure(
            "Audio",
            "http://example.com/1.mp3",
            Some("audio/mpeg"),
        )]));
        let cache = PodcastFeedCache::new(fetcher, index.clone(), Duration::from_secs(60), 10);

        let first = cache.get(&podcast(), false).await.unwrap();
        assert_eq!(first[0].name, "Audio");
        assert!(cache.invalidate("http://example.com/rss").await);

        let second = cache.get(&podcast(), false).await.unwrap();
        assert_ne!(first[0].id, second[0].id);
        assert!(index.get(&first[0].id).is_none());
        assert!(index.get(&second[0].id).is_some());
        assert_eq!(index.len(), 1);
    }
}
