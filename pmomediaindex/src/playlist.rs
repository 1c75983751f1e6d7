//! M3U playlists
//!
//! Extended playlists start with `#EXTM3U`; their tracks are labelled by
//! the preceding `#EXTINF:<duration>,<label>` line and path lines without
//! one are ignored. Plain playlists list one path per line, labelled by the
//! file name.

use crate::error::{MediaError, Result};
use std::path::{Path, PathBuf};

const EXTM3U: &str = "#EXTM3U";
const EXTINF: &str = "#EXTINF:";

/// A playlist line that may point to a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistLine {
    pub label: String,
    pub location: String,
}

/// A resolved playlist track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub label: String,
    pub path: PathBuf,
}

/// Parses playlist content without touching the filesystem
pub fn parse_m3u(content: &str) -> Vec<PlaylistLine> {
    let mut lines = content
        .lines()
        .map(|line| line.trim_start_matches('\u{feff}').trim())
        .filter(|line| !line.is_empty())
        .peekable();

    let extended = lines.peek().is_some_and(|first| first.eq_ignore_ascii_case(EXTM3U));
    let mut result = Vec::new();

    if extended {
        let mut label: Option<String> = None;
        for line in lines {
            if let Some(info) = line.strip_prefix(EXTINF) {
                label = info.rsplit(',').next().map(|l| l.trim().to_string());
            } else if line.starts_with('#') {
                continue;
            } else if let Some(label) = label.take() {
                result.push(PlaylistLine {
                    label,
                    location: line.to_string(),
                });
            }
        }
    } else {
        for line in lines.filter(|line| !line.starts_with('#')) {
            let label = Path::new(line)
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| line.to_string());
            result.push(PlaylistLine {
                label,
                location: line.to_string(),
            });
        }
    }

    result
}

/// Reads a playlist and keeps the tracks that exist as regular files
///
/// Each location is tried as given, then relative to the playlist's
/// directory. Track paths are returned absolute.
pub async fn read_playlist(path: &Path) -> Result<Vec<PlaylistEntry>> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MediaError::Playlist(format!("{}: {}", path.display(), e)))?;
    let content = String::from_utf8_lossy(&bytes);
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));

    let mut entries = Vec::new();
    for line in parse_m3u(&content) {
        let given = PathBuf::from(&line.location);
        let candidates = [given.clone(), base_dir.join(&given)];
        let mut resolved = None;
        for candidate in candidates {
            if tokio::fs::metadata(&candidate)
                .await
                .is_ok_and(|meta| meta.is_file())
            {
                resolved = Some(std::path::absolute(&candidate).unwrap_or(candidate));
                break;
            }
        }

        match resolved {
            Some(track) => entries.push(PlaylistEntry {
                label: line.label,
                path: track,
            }),
            None => tracing::debug!(
                playlist = %path.display(),
                location = %line.location,
                "Skipping unresolvable playlist entry"
            ),
        }
    }
    Ok(entries)
}
