//! Node resolution
//!
//! Turns a node id into a [`MediaNode`]. Anything that cannot be resolved
//! (unknown id, missing or hidden file, unknown mime type) yields `None`.

use crate::index::IndexEntry;
use crate::manager::MediaManager;
use crate::media_type::MediaType;
use crate::mime::{mime_type_of, MimeType};
use crate::node::{ContentNode, FolderNode, MediaNode, PlaylistNode, PodcastEntryNode, PodcastNode};
use crate::root::RootNode;
use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::Path;

/// Base name of a path or URL
pub(crate) fn base_name(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    Path::new(trimmed)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Builds the node of a regular file listed under a folder of `expected` type
///
/// Playlists are always kept; other files only when their category matches
/// the folder, or when they are subtitles and subtitles are enabled.
pub(crate) fn build_file_node(
    id: &str,
    parent_id: &str,
    path: &Path,
    metadata: &Metadata,
    expected: MediaType,
    name: Option<&str>,
    subtitles: bool,
) -> Option<MediaNode> {
    let file_name = path.file_name()?.to_string_lossy().to_string();
    let mime_type = mime_type_of(&file_name)?;
    let name = name.map(str::to_string).unwrap_or(file_name);

    match mime_type.category() {
        Some(MediaType::Playlist) => Some(MediaNode::Playlist(PlaylistNode {
            id: id.to_string(),
            parent_id: parent_id.to_string(),
            name,
            path: path.to_path_buf(),
        })),
        Some(category) if category == expected => Some(content_node(
            id, parent_id, path, metadata, mime_type, name,
        )),
        _ if subtitles && mime_type.is_subtitle() => Some(content_node(
            id, parent_id, path, metadata, mime_type, name,
        )),
        _ => None,
    }
}

pub(crate) fn content_node(
    id: &str,
    parent_id: &str,
    path: &Path,
    metadata: &Metadata,
    mime_type: MimeType,
    name: String,
) -> MediaNode {
    MediaNode::Content(ContentNode {
        id: id.to_string(),
        parent_id: parent_id.to_string(),
        name,
        path: path.to_path_buf(),
        size: metadata.len(),
        mime_type,
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
    })
}

impl MediaManager {
    /// Resolves a node id
    ///
    /// # Returns
    ///
    /// `None` when the id is unknown or its backing file or directory is
    /// missing, unreadable or hidden.
    pub async fn resolve(&self, node_id: &str) -> Option<MediaNode> {
        // 1. Racines bien connues
        if let Some(root) = RootNode::from_id(node_id) {
            return Some(MediaNode::Folder(self.root_folder(root)));
        }

        // 2. Index
        let Some(entry) = self.index.get(node_id) else {
            tracing::warn!(node_id = %node_id, "Node not found in media index");
            return None;
        };

        match entry.media_type {
            // 3. Podcasts
            MediaType::Podcast => Some(MediaNode::Podcast(PodcastNode {
                id: node_id.to_string(),
                parent_id: entry.parent_id.clone(),
                name: entry.name.clone().unwrap_or_else(|| entry.path.clone()),
                url: entry.path,
            })),
            // 4. Playlists
            MediaType::Playlist => Some(MediaNode::Playlist(PlaylistNode {
                id: node_id.to_string(),
                parent_id: entry.parent_id.clone(),
                name: entry.name.clone().unwrap_or_else(|| base_name(&entry.path)),
                path: entry.path.into(),
            })),
            _ if entry.is_remote() => self.resolve_podcast_entry(node_id, entry).await,
            // 5. Fichiers et dossiers
            _ => self.resolve_path(node_id, &entry).await,
        }
    }

    async fn resolve_path(&self, node_id: &str, entry: &IndexEntry) -> Option<MediaNode> {
        let path = Path::new(&entry.path);
        if is_hidden(path) {
            return None;
        }
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(node_id = %node_id, path = %entry.path, "Cannot stat indexed path: {}", e);
                return None;
            }
        };

        if metadata.is_dir() {
            Some(MediaNode::Folder(FolderNode {
                id: node_id.to_string(),
                parent_id: entry.parent_id.clone(),
                name: entry.name.clone().unwrap_or_else(|| base_name(&entry.path)),
                path: Some(path.to_path_buf()),
            }))
        } else if metadata.is_file() {
            build_file_node(
                node_id,
                &entry.parent_id,
                path,
                &metadata,
                entry.media_type,
                entry.name.as_deref(),
                self.subtitles_enabled(),
            )
        } else {
            None
        }
    }

    /// Podcast entry from the cached feed, or rebuilt from the index entry
    async fn resolve_podcast_entry(&self, node_id: &str, entry: IndexEntry) -> Option<MediaNode> {
        let feed = self
            .index
            .get(&entry.parent_id)
            .filter(|parent| parent.media_type == MediaType::Podcast);
        if let Some(feed) = feed {
            if let Some(cached) = self.podcasts.cached_entry(&feed.path, node_id).await {
                return Some(MediaNode::PodcastEntry(cached));
            }
        }

        let mime_type = entry.mime_type.as_deref().and_then(MimeType::parse)?;
        Some(MediaNode::PodcastEntry(PodcastEntryNode {
            id: node_id.to_string(),
            parent_id: entry.parent_id,
            name: entry.name.unwrap_or_else(|| base_name(&entry.path)),
            url: entry.path,
            mime_type,
            duration: None,
            icon_url: None,
            published: None,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("/media/movies/movie.avi"), "movie.avi");
        assert_eq!(base_name("/media/movies/"), "movies");
        assert_eq!(base_name("http://example.com/ep.mp3"), "ep.mp3");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(Path::new("/media/.hidden")));
        assert!(!is_hidden(Path::new("/media/visible.avi")));
    }
}
