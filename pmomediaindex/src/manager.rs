//! Media manager
//!
//! Entry point of the media tree: node resolution ([`resolve`](MediaManager::resolve)),
//! child enumeration ([`children`](MediaManager::children)), scans and cache
//! maintenance. The manager is cheap to clone and shared between request
//! handlers, the reconciliation listener and the schedulers.

use crate::config_ext::MediaConfigExt;
use crate::error::Result;
use crate::index::MediaIndex;
use crate::node::FolderNode;
use crate::podcast::PodcastFeedCache;
use crate::root::RootNode;
use pmoconfig::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct MediaManager {
    pub(crate) config: Arc<Config>,
    pub(crate) index: Arc<MediaIndex>,
    pub(crate) podcasts: Arc<PodcastFeedCache>,
}

impl MediaManager {
    pub fn new(config: Arc<Config>, index: Arc<MediaIndex>, podcasts: Arc<PodcastFeedCache>) -> Self {
        Self {
            config,
            index,
            podcasts,
        }
    }

    /// Builds a manager with an empty index and an HTTP podcast client
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let index = Arc::new(MediaIndex::new());
        let podcasts = Arc::new(PodcastFeedCache::from_config(&config, index.clone())?);
        Ok(Self::new(config, index, podcasts))
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn index(&self) -> &Arc<MediaIndex> {
        &self.index
    }

    pub fn podcasts(&self) -> &Arc<PodcastFeedCache> {
        &self.podcasts
    }

    /// Synthetic folder of a well-known root
    pub(crate) fn root_folder(&self, root: RootNode) -> FolderNode {
        let name = self.config.get_root_label(root).unwrap_or_else(|e| {
            tracing::warn!(root = root.id(), "Cannot read root label: {}", e);
            root.default_label().to_string()
        });
        FolderNode {
            id: root.id().to_string(),
            parent_id: root.parent_id().to_string(),
            name,
            path: None,
        }
    }

    pub(crate) fn subtitles_enabled(&self) -> bool {
        self.config.get_enable_external_subtitles().unwrap_or_else(|e| {
            tracing::warn!("Cannot read subtitle setting: {}", e);
            true
        })
    }

    /// Purges expired podcast feeds
    pub async fn clean_podcast_cache(&self) -> u64 {
        self.podcasts.clean_up().await
    }

    /// Sweeps stale entries from the index
    ///
    /// Path checks run on the blocking thread pool.
    pub async fn clean_index(&self) -> usize {
        let index = self.index.clone();
        match tokio::task::spawn_blocking(move || index.clean()).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::error!("Media index sweep failed: {}", e);
                0
            }
        }
    }
}

impl std::fmt::Debug for MediaManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaManager")
            .field("config_dir", &self.config.directory())
            .field("indexed", &self.index.len())
            .field("podcasts", &self.podcasts)
            .finish()
    }
}
