//! Resolved nodes
//!
//! A [`MediaNode`] is rebuilt for every request from the index entry and
//! the live filesystem or feed state. Nodes are never stored.

use crate::mime::MimeType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    /// Backing directory, `None` for the well-known roots
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentNode {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub mime_type: MimeType,
    pub modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistNode {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodcastNode {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    /// Feed URL
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodcastEntryNode {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    /// Enclosure URL
    pub url: String,
    pub mime_type: MimeType,
    pub duration: Option<String>,
    pub icon_url: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// A node of the media tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaNode {
    Folder(FolderNode),
    Content(ContentNode),
    Playlist(PlaylistNode),
    Podcast(PodcastNode),
    PodcastEntry(PodcastEntryNode),
}

impl MediaNode {
    pub fn id(&self) -> &str {
        match self {
            MediaNode::Folder(n) => &n.id,
            MediaNode::Content(n) => &n.id,
            MediaNode::Playlist(n) => &n.id,
            MediaNode::Podcast(n) => &n.id,
            MediaNode::PodcastEntry(n) => &n.id,
        }
    }

    pub fn parent_id(&self) -> &str {
        match self {
            MediaNode::Folder(n) => &n.parent_id,
            MediaNode::Content(n) => &n.parent_id,
            MediaNode::Playlist(n) => &n.parent_id,
            MediaNode::Podcast(n) => &n.parent_id,
            MediaNode::PodcastEntry(n) => &n.parent_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MediaNode::Folder(n) => &n.name,
            MediaNode::Content(n) => &n.name,
            MediaNode::Playlist(n) => &n.name,
            MediaNode::Podcast(n) => &n.name,
            MediaNode::PodcastEntry(n) => &n.name,
        }
    }

    /// Mime type of playable nodes, subject to device filtering
    pub fn mime_type(&self) -> Option<&MimeType> {
        match self {
            MediaNode::Content(n) => Some(&n.mime_type),
            MediaNode::PodcastEntry(n) => Some(&n.mime_type),
            MediaNode::Folder(_) | MediaNode::Playlist(_) | MediaNode::Podcast(_) => None,
        }
    }

    /// `true` for nodes that may have children
    pub fn is_container(&self) -> bool {
        self.mime_type().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let node = MediaNode::PodcastEntry(PodcastEntryNode {
            id: "e1".to_string(),
            parent_id: "p1".to_string(),
            name: "Episode".to_string(),
            url: "http://example.com/1.mp3".to_string(),
            mime_type: MimeType::parse("audio/mpeg").unwrap(),
            duration: Some("12:34".to_string()),
            icon_url: None,
            published: None,
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "podcast_entry");
        assert_eq!(json["mime_type"], "audio/mpeg");
        assert_eq!(json["parent_id"], "p1");
        assert!(!node.is_container());

        let folder = MediaNode::Folder(FolderNode {
            id: "0".to_string(),
            parent_id: "-1".to_string(),
            name: "Root".to_string(),
            path: None,
        });
        assert_eq!(serde_json::to_value(&folder).unwrap()["kind"], "folder");
        assert!(folder.is_container());
    }
}
