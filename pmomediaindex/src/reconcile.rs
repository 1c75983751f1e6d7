//! Configuration reconciliation
//!
//! Applies folder changes from the configuration to the media index. Events
//! arrive on the channel returned by [`pmoconfig::Config::subscribe`].

use crate::index::IndexEntry;
use crate::manager::MediaManager;
use crate::media_type::MediaType;
use crate::root::RootNode;
use pmoconfig::{ConfigEventType, ConfigurationEvent, ConfigurationNode, FolderCategory};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Index entry of a folder declared in the configuration
pub fn entry_from(node: &ConfigurationNode, category: FolderCategory) -> IndexEntry {
    IndexEntry::new(
        RootNode::from_category(category).id(),
        MediaType::from(category),
        &node.path,
    )
    .named(&node.label)
}

/// Keeps the index in line with the configured folders
#[derive(Debug, Clone)]
pub struct ReconciliationListener {
    manager: MediaManager,
}

impl ReconciliationListener {
    pub fn new(manager: MediaManager) -> Self {
        Self { manager }
    }

    /// Applies one configuration event
    pub async fn handle(&self, event: &ConfigurationEvent) {
        let node = &event.node;
        tracing::debug!(
            event = ?event.event_type,
            category = %event.category,
            node_id = %node.id,
            "Reconciling media index"
        );

        match event.event_type {
            ConfigEventType::Add => {
                self.manager
                    .index
                    .put(&node.id, entry_from(node, event.category));
            }
            ConfigEventType::Update => {
                self.remove(node, event.category).await;
                self.manager
                    .index
                    .put(&node.id, entry_from(node, event.category));
            }
            ConfigEventType::Delete => self.remove(node, event.category).await,
        }
    }

    async fn remove(&self, node: &ConfigurationNode, category: FolderCategory) {
        let index = &self.manager.index;
        let Some(previous) = index.remove(&node.id) else {
            tracing::warn!(
                category = %category,
                node_id = %node.id,
                "Configuration event refers to a node missing from the media index"
            );
            return;
        };

        if category == FolderCategory::Podcast {
            // Les épisodes sont rechargés depuis le flux
            self.manager.podcasts.invalidate(&previous.path).await;
        } else {
            let removed = index.remove_subtree(&node.id);
            tracing::info!(node_id = %node.id, removed, "Media folder subtree dropped");
        }
    }

    /// Consumes events until every sender is gone
    pub async fn run(self, mut events: UnboundedReceiver<ConfigurationEvent>) {
        tracing::info!("Media index reconciliation started");
        while let Some(event) = events.recv().await {
            self.handle(&event).await;
        }
        tracing::info!("Media index reconciliation stopped");
    }

    pub fn spawn(self, events: UnboundedReceiver<ConfigurationEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_configuration_node() {
        let node = ConfigurationNode::new("v1", "Movies", "/media/movies");
        let entry = entry_from(&node, FolderCategory::Video);
        assert_eq!(entry.parent_id, "1_VIDEOS");
        assert_eq!(entry.media_type, MediaType::Video);
        assert_eq!(entry.path, "/media/movies");
        assert_eq!(entry.name.as_deref(), Some("Movies"));
        assert!(!entry.ephemeral);

        let podcast = ConfigurationNode::new("p1", "News", "http://example.com/rss");
        assert_eq!(entry_from(&podcast, FolderCategory::Podcast).parent_id, "4_PODCASTS");
    }
}
