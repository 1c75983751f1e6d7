//! Well-known root nodes
//!
//! The ids and bundle keys below are shared with the UI layer and must not
//! change.

use crate::media_type::MediaType;
use pmoconfig::FolderCategory;

/// Synthetic nodes at the top of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootNode {
    Root,
    Video,
    Picture,
    Audio,
    Podcast,
}

impl RootNode {
    /// Category roots, in display order
    pub const CATEGORIES: [RootNode; 4] = [
        RootNode::Video,
        RootNode::Picture,
        RootNode::Audio,
        RootNode::Podcast,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            RootNode::Root => "0",
            RootNode::Video => "1_VIDEOS",
            RootNode::Picture => "2_PICTURES",
            RootNode::Audio => "3_AUDIOS",
            RootNode::Podcast => "4_PODCASTS",
        }
    }

    pub fn parent_id(&self) -> &'static str {
        match self {
            RootNode::Root => "-1",
            _ => RootNode::Root.id(),
        }
    }

    /// Media type of the children, `None` for the top node
    pub fn media_type(&self) -> Option<MediaType> {
        self.folder_category().map(MediaType::from)
    }

    /// Key of the localized label
    pub fn bundle_key(&self) -> String {
        format!("rootNode.{}", self.id())
    }

    /// Label used when no localized label is configured
    pub fn default_label(&self) -> &'static str {
        match self {
            RootNode::Root => "Root",
            RootNode::Video => "Videos",
            RootNode::Picture => "Pictures",
            RootNode::Audio => "Audio",
            RootNode::Podcast => "Podcasts",
        }
    }

    pub fn from_id(id: &str) -> Option<RootNode> {
        std::iter::once(RootNode::Root)
            .chain(RootNode::CATEGORIES)
            .find(|root| root.id() == id)
    }

    pub fn is_root_id(id: &str) -> bool {
        Self::from_id(id).is_some()
    }

    /// Configuration category listed under this root
    pub fn folder_category(&self) -> Option<FolderCategory> {
        match self {
            RootNode::Root => None,
            RootNode::Video => Some(FolderCategory::Video),
            RootNode::Picture => Some(FolderCategory::Picture),
            RootNode::Audio => Some(FolderCategory::Audio),
            RootNode::Podcast => Some(FolderCategory::Podcast),
        }
    }

    pub fn from_category(category: FolderCategory) -> RootNode {
        match category {
            FolderCategory::Video => RootNode::Video,
            FolderCategory::Picture => RootNode::Picture,
            FolderCategory::Audio => RootNode::Audio,
            FolderCategory::Podcast => RootNode::Podcast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_ids() {
        assert_eq!(RootNode::from_id("0"), Some(RootNode::Root));
        assert_eq!(RootNode::from_id("1_VIDEOS"), Some(RootNode::Video));
        assert_eq!(RootNode::from_id("4_PODCASTS"), Some(RootNode::Podcast));
        assert_eq!(RootNode::from_id("1_videos"), None);
        assert_eq!(RootNode::Picture.bundle_key(), "rootNode.2_PICTURES");
        assert_eq!(RootNode::Audio.parent_id(), "0");
        assert_eq!(RootNode::Root.media_type(), None);
        assert_eq!(RootNode::Picture.media_type(), Some(MediaType::Image));
    }
}
