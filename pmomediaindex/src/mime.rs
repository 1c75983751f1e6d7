//! Mime types and device compliance

use crate::media_type::MediaType;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Mime type of external subtitle files
pub const SUBTITLE_MIME_TYPE: &str = "application/x-subrip";

const PLAYLIST_MIME_TYPES: &[&str] = &[
    "audio/x-mpegurl",
    "audio/mpegurl",
    "application/x-mpegurl",
    "application/vnd.apple.mpegurl",
];

/// A `type/subtype` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MimeType {
    mime: String,
    type_: String,
    sub_type: String,
}

impl MimeType {
    /// Parses `type/subtype`, dropping parameters such as `; charset=utf-8`
    ///
    /// Returns `None` when either half is empty.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        let (type_, sub_type) = essence.split_once('/')?;
        let (type_, sub_type) = (type_.trim(), sub_type.trim());
        if type_.is_empty() || sub_type.is_empty() {
            return None;
        }
        let (type_, sub_type) = (type_.to_ascii_lowercase(), sub_type.to_ascii_lowercase());
        Some(Self {
            mime: format!("{}/{}", type_, sub_type),
            type_,
            sub_type,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.mime
    }

    pub fn type_name(&self) -> &str {
        &self.type_
    }

    pub fn sub_type(&self) -> &str {
        &self.sub_type
    }

    /// Media category, playlists first
    pub fn category(&self) -> Option<MediaType> {
        if PLAYLIST_MIME_TYPES.contains(&self.mime.as_str()) {
            return Some(MediaType::Playlist);
        }
        match self.type_.as_str() {
            "video" => Some(MediaType::Video),
            "audio" => Some(MediaType::Audio),
            "image" => Some(MediaType::Image),
            "application" => Some(MediaType::Application),
            _ => None,
        }
    }

    /// `true` for playable video, audio or image content
    pub fn is_media(&self) -> bool {
        self.category().is_some_and(|c| c.is_media())
    }

    pub fn is_subtitle(&self) -> bool {
        self.mime == SUBTITLE_MIME_TYPE
    }

    /// Checks this mime type against the patterns advertised by a device
    ///
    /// Compliant when the list is absent or empty, or contains `type/subtype`,
    /// `*/*` or `type/*`.
    pub fn is_compliant(&self, supported: Option<&[String]>) -> bool {
        let Some(supported) = supported.filter(|list| !list.is_empty()) else {
            return true;
        };
        let wildcard = format!("{}/*", self.type_);
        supported
            .iter()
            .any(|pattern| pattern == &self.mime || pattern == "*/*" || pattern == &wildcard)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mime)
    }
}

impl Serialize for MimeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.mime)
    }
}

/// Mime type of a file, from its extension
pub fn mime_type_of(filename: &str) -> Option<MimeType> {
    let extension = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    let mime = match extension.as_str() {
        // Video
        "avi" | "divx" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "mov" => "video/quicktime",
        "mpg" | "mpeg" => "video/mpeg",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "webm" => "video/webm",
        "ts" => "video/mp2t",
        "ogv" => "video/ogg",
        "3gp" => "video/3gpp",
        // Audio
        "mp3" => "audio/mpeg",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/x-wav",
        "wma" => "audio/x-ms-wma",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "opus" => "audio/opus",
        "aif" | "aiff" => "audio/x-aiff",
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        // Subtitles
        "srt" => SUBTITLE_MIME_TYPE,
        // Playlists
        "m3u" | "m3u8" => "audio/x-mpegurl",
        // Misc
        "txt" => "text/plain",
        _ => return None,
    };
    MimeType::parse(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(mime: &MimeType, patterns: &[&str]) -> bool {
        let supported: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        mime.is_compliant(Some(supported.as_slice()))
    }

    #[test]
    fn test_compliance_table() {
        let avi = mime_type_of("movie.avi").unwrap();
        let mp3 = mime_type_of("song.mp3").unwrap();
        assert_eq!(avi.as_str(), "video/x-msvideo");
        assert_eq!(mp3.as_str(), "audio/mpeg");

        assert!(check(&avi, &["video/*"]));
        assert!(!check(&mp3, &["video/*"]));

        assert!(mp3.is_compliant(None));
        assert!(check(&mp3, &[]));
        assert!(check(&mp3, &["*/*"]));
        assert!(check(&mp3, &["image/png", "audio/mpeg"]));
        assert!(!check(&mp3, &["audio/flac", "audio/mp*"]));
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            mime_type_of("list.M3U").unwrap().category(),
            Some(MediaType::Playlist)
        );
        let srt = mime_type_of("movie.srt").unwrap();
        assert!(srt.is_subtitle());
        assert!(!srt.is_media());
        assert_eq!(srt.category(), Some(MediaType::Application));
        assert_eq!(mime_type_of("notes.txt").unwrap().category(), None);
        assert!(mime_type_of("README").is_none());
        assert!(mime_type_of("archive.xyz").is_none());
    }

    #[test]
    fn test_parse() {
        let mime = MimeType::parse(" Audio/MPEG; charset=binary").unwrap();
        assert_eq!(mime.as_str(), "audio/mpeg");
        assert_eq!(mime.type_name(), "audio");
        assert_eq!(mime.sub_type(), "mpeg");
        assert!(MimeType::parse("audio").is_none());
        assert!(MimeType::parse("/mpeg").is_none());
    }
}
