//! Error types for the media index

use std::sync::Arc;

/// Result type alias for media index operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// Errors raised inside the media index
///
/// Client-facing operations ([`resolve`](crate::MediaManager::resolve),
/// [`children`](crate::MediaManager::children), scans) never return these:
/// they are logged and turned into an absent node or an empty listing.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Feed fetch or parse failure, shared by every waiter of the fetch
    #[error("Podcast error: {0}")]
    Podcast(Arc<pmopodcast::Error>),

    /// Unreadable playlist
    #[error("Playlist error: {0}")]
    Playlist(String),

    /// Configuration error (from pmoconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl From<Arc<pmopodcast::Error>> for MediaError {
    fn from(e: Arc<pmopodcast::Error>) -> Self {
        Self::Podcast(e)
    }
}

impl From<pmopodcast::Error> for MediaError {
    fn from(e: pmopodcast::Error) -> Self {
        Self::Podcast(Arc::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_errors_convert_to_podcast() {
        let error = MediaError::from(pmopodcast::Error::Status {
            url: "http://example.com/rss".to_string(),
            status: 404,
        });
        assert!(matches!(error, MediaError::Podcast(_)));
        assert!(error.to_string().starts_with("Podcast error: "));

        let error: MediaError = anyhow::anyhow!("missing key").into();
        assert!(matches!(error, MediaError::Config(_)));
    }
}
