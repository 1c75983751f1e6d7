//! Data model of a parsed feed

use chrono::{DateTime, Utc};

/// One enclosure of a feed item
///
/// An item carrying two enclosures yields two entries sharing the same
/// title, duration, icon and publication date.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedEntry {
    /// Item title (empty when the item has none)
    pub title: String,
    /// Enclosure URL
    pub url: String,
    /// Declared mime type of the enclosure
    pub mime_type: Option<String>,
    /// Raw `itunes:duration` value (`HH:MM:SS`, `MM:SS` or seconds)
    pub duration: Option<String>,
    /// Thumbnail URL
    pub icon_url: Option<String>,
    /// Publication date
    pub published: Option<DateTime<Utc>>,
}
