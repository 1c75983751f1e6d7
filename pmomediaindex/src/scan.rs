//! Index warm-up
//!
//! Walks the media tree from a node, letting the child enumerator register
//! everything it discovers. Podcasts and playlists only have their direct
//! children listed.

use crate::manager::MediaManager;
use crate::node::MediaNode;
use crate::root::RootNode;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

/// Nodes visited by a scan, by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub folders: usize,
    pub contents: usize,
    pub playlists: usize,
    pub podcasts: usize,
    pub podcast_entries: usize,
}

impl ScanStats {
    fn record(&mut self, node: &MediaNode) {
        match node {
            MediaNode::Folder(_) => self.folders += 1,
            MediaNode::Content(_) => self.contents += 1,
            MediaNode::Playlist(_) => self.playlists += 1,
            MediaNode::Podcast(_) => self.podcasts += 1,
            MediaNode::PodcastEntry(_) => self.podcast_entries += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.folders + self.contents + self.playlists + self.podcasts + self.podcast_entries
    }
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} folders, {} contents, {} playlists, {} podcasts, {} podcast entries",
            self.folders, self.contents, self.playlists, self.podcasts, self.podcast_entries
        )
    }
}

impl MediaManager {
    /// Scans the whole tree from the top node
    pub async fn scan_all(&self) -> ScanStats {
        self.scan_node(RootNode::Root.id()).await
    }

    /// Scans the subtree below `node_id`
    ///
    /// An unknown id gives empty statistics.
    pub async fn scan_node(&self, node_id: &str) -> ScanStats {
        let started = Instant::now();
        let mut stats = ScanStats::default();

        let Some(start) = self.resolve(node_id).await else {
            tracing::warn!(node_id = %node_id, "Cannot scan unknown node");
            return stats;
        };
        stats.record(&start);

        // Chemins déjà parcourus, pour les liens symboliques en boucle
        let mut visited: HashSet<PathBuf> = HashSet::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if let MediaNode::Folder(folder) = &node {
                if let Some(path) = &folder.path {
                    let canonical = tokio::fs::canonicalize(path)
                        .await
                        .unwrap_or_else(|_| path.clone());
                    if !visited.insert(canonical) {
                        tracing::debug!(node_id = %folder.id, path = %path.display(), "Folder already scanned");
                        continue;
                    }
                }
            }

            for child in self.children(&node, None).await {
                stats.record(&child);
                match child {
                    MediaNode::Folder(_) => stack.push(child),
                    MediaNode::Podcast(_) | MediaNode::Playlist(_) => {
                        for leaf in self.children(&child, None).await {
                            stats.record(&leaf);
                        }
                    }
                    MediaNode::Content(_) | MediaNode::PodcastEntry(_) => {}
                }
            }
        }

        tracing::info!(
            node_id = %node_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            indexed = self.index.len(),
            "Media scan finished: {}",
            stats
        );
        stats
    }
}
