//! Child enumeration
//!
//! Children are derived again on every call from the configuration, the
//! filesystem, the podcast feeds or the playlist files. Discovered nodes are
//! registered in the index as a side effect. Failures give an empty listing.

use crate::config_ext::MediaConfigExt;
use crate::device::Device;
use crate::index::{IndexEntry, MediaIndex};
use crate::manager::MediaManager;
use crate::media_type::MediaType;
use crate::mime::mime_type_of;
use crate::node::{FolderNode, MediaNode, PlaylistNode, PodcastNode};
use crate::playlist::read_playlist;
use crate::resolver::{build_file_node, content_node, is_hidden};
use crate::root::RootNode;
use std::path::{Path, PathBuf};

impl MediaManager {
    /// Lists the children of a resolved node
    ///
    /// When `device` advertises supported mime types, content and podcast
    /// entries it cannot render are filtered out. Containers always pass.
    ///
    /// # Arguments
    ///
    /// * `parent` - A node previously returned by [`resolve`](Self::resolve) or `children`
    /// * `device` - The requesting device, if any
    pub async fn children(&self, parent: &MediaNode, device: Option<&dyn Device>) -> Vec<MediaNode> {
        let nodes = match parent {
            MediaNode::Folder(folder) => match RootNode::from_id(&folder.id) {
                Some(RootNode::Root) => self.root_children().await,
                Some(root) => self.category_children(root).await,
                None => self.folder_children(folder).await,
            },
            MediaNode::Podcast(podcast) => self.podcast_children(podcast).await,
            MediaNode::Playlist(playlist) => self.playlist_children(playlist).await,
            MediaNode::Content(_) | MediaNode::PodcastEntry(_) => Vec::new(),
        };

        let supported = device.and_then(|d| d.supported_mime_types());
        nodes
            .into_iter()
            .filter(|node| {
                node.is_container() || node.mime_type().is_some_and(|mime| mime.is_compliant(supported))
            })
            .collect()
    }

    /// Category roots that have at least one child
    async fn root_children(&self) -> Vec<MediaNode> {
        let mut nodes = Vec::new();
        for root in RootNode::CATEGORIES {
            if !self.category_children(root).await.is_empty() {
                nodes.push(MediaNode::Folder(self.root_folder(root)));
            }
        }
        nodes
    }

    /// Folders (or podcasts) declared in the configuration for a category
    ///
    /// Each one is registered under its configuration id. Local folders
    /// that are not readable directories are skipped.
    async fn category_children(&self, root: RootNode) -> Vec<MediaNode> {
        let (Some(category), Some(media_type)) = (root.folder_category(), root.media_type()) else {
            return Vec::new();
        };

        let mut nodes = Vec::new();
        for folder in self.config.get_folders(category) {
            let entry = IndexEntry::new(root.id(), media_type, &folder.path).named(&folder.label);

            if media_type == MediaType::Podcast {
                self.index.put(&folder.id, entry);
                nodes.push(MediaNode::Podcast(PodcastNode {
                    id: folder.id,
                    parent_id: root.id().to_string(),
                    name: folder.label,
                    url: folder.path,
                }));
                continue;
            }

            let path = PathBuf::from(&folder.path);
            let is_dir = tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_dir());
            if !is_dir || is_hidden(&path) {
                tracing::debug!(folder_id = %folder.id, path = %folder.path, "Skipping unavailable media folder");
                continue;
            }

            self.index.put(&folder.id, entry);
            nodes.push(MediaNode::Folder(FolderNode {
                id: folder.id,
                parent_id: root.id().to_string(),
                name: folder.label,
                path: Some(path),
            }));
        }
        nodes
    }

    async fn folder_children(&self, folder: &FolderNode) -> Vec<MediaNode> {
        let Some(entry) = self.index.get(&folder.id) else {
            tracing::warn!(node_id = %folder.id, "Folder not found in media index");
            return Vec::new();
        };
        let directory = folder.path.clone().unwrap_or_else(|| PathBuf::from(&entry.path));
        let directory = std::path::absolute(&directory).unwrap_or(directory);
        let expected = entry.media_type;
        let subtitles = self.subtitles_enabled();

        let mut read_dir = match tokio::fs::read_dir(&directory).await {
            Ok(read_dir) => read_dir,
            Err(e) => {
                tracing::warn!(node_id = %folder.id, path = %directory.display(), "Cannot list folder: {}", e);
                return Vec::new();
            }
        };

        let mut nodes = Vec::new();
        loop {
            let dir_entry = match read_dir.next_entry().await {
                Ok(Some(dir_entry)) => dir_entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(path = %directory.display(), "Folder listing interrupted: {}", e);
                    break;
                }
            };
            let path = dir_entry.path();
            if is_hidden(&path) {
                continue;
            }
            // Suit les liens symboliques
            let Ok(metadata) = tokio::fs::metadata(&path).await else {
                continue;
            };
            if let Some(node) = self.register_child(&folder.id, &path, &metadata, expected, subtitles) {
                nodes.push(node);
            }
        }
        nodes
    }

    /// Registers one directory entry and builds its node
    ///
    /// Files that give no node are not registered.
    fn register_child(
        &self,
        parent_id: &str,
        path: &Path,
        metadata: &std::fs::Metadata,
        expected: MediaType,
        subtitles: bool,
    ) -> Option<MediaNode> {
        let path_str = path.to_string_lossy().to_string();
        let name = path.file_name()?.to_string_lossy().to_string();

        if metadata.is_dir() {
            let id = self
                .index
                .add(IndexEntry::new(parent_id, expected, &path_str).ephemeral());
            return Some(MediaNode::Folder(FolderNode {
                id,
                parent_id: parent_id.to_string(),
                name,
                path: Some(path.to_path_buf()),
            }));
        }
        if !metadata.is_file() {
            return None;
        }

        let media_type = match mime_type_of(&name)?.category() {
            Some(MediaType::Playlist) => MediaType::Playlist,
            _ => expected,
        };
        let entry = IndexEntry::new(parent_id, media_type, &path_str).ephemeral();
        let id = MediaIndex::node_id(&entry);
        let node = build_file_node(&id, parent_id, path, metadata, expected, None, subtitles)?;
        self.index.add(entry);
        Some(node)
    }

    async fn podcast_children(&self, podcast: &PodcastNode) -> Vec<MediaNode> {
        let prepend = self.config.get_prepend_podcast_entry_name().unwrap_or_else(|e| {
            tracing::warn!("Cannot read podcast naming setting: {}", e);
            false
        });
        match self.podcasts.get(podcast, prepend).await {
            Ok(entries) => entries.iter().cloned().map(MediaNode::PodcastEntry).collect(),
            Err(e) => {
                tracing::error!(podcast_id = %podcast.id, feed_url = %podcast.url, "Cannot load podcast: {}", e);
                Vec::new()
            }
        }
    }

    /// Playable tracks of a playlist, labelled as in the playlist
    async fn playlist_children(&self, playlist: &PlaylistNode) -> Vec<MediaNode> {
        let entries = match read_playlist(&playlist.path).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(node_id = %playlist.id, "Cannot read playlist: {}", e);
                return Vec::new();
            }
        };

        let mut nodes = Vec::new();
        for track in entries {
            let Some(file_name) = track.path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            let Some(mime_type) = mime_type_of(&file_name).filter(|m| m.is_media()) else {
                continue;
            };
            let Some(media_type) = mime_type.category() else {
                continue;
            };
            let Ok(metadata) = tokio::fs::metadata(&track.path).await else {
                continue;
            };

            let id = self.index.add(
                IndexEntry::new(&playlist.id, media_type, track.path.to_string_lossy())
                    .named(&track.label)
                    .ephemeral(),
            );
            nodes.push(content_node(
                &id,
                &playlist.id,
                &track.path,
                &metadata,
                mime_type,
                track.label,
            ));
        }
        nodes
    }
}
