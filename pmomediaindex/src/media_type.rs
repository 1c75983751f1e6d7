use pmoconfig::FolderCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an indexed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
    Image,
    Podcast,
    Playlist,
    Application,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Video => "video",
            MediaType::Audio => "audio",
            MediaType::Image => "image",
            MediaType::Podcast => "podcast",
            MediaType::Playlist => "playlist",
            MediaType::Application => "application",
        }
    }

    /// `true` for playable content (video, audio, image)
    pub fn is_media(&self) -> bool {
        matches!(self, MediaType::Video | MediaType::Audio | MediaType::Image)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FolderCategory> for MediaType {
    fn from(category: FolderCategory) -> Self {
        match category {
            FolderCategory::Video => MediaType::Video,
            FolderCategory::Audio => MediaType::Audio,
            FolderCategory::Picture => MediaType::Image,
            FolderCategory::Podcast => MediaType::Podcast,
        }
    }
}
