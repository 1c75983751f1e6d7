//! Error types for the podcast client

/// Result type alias for podcast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or parsing a feed
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Feed {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// XML parsing failed
    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document is not an RSS or Atom feed
    #[error("Invalid feed: {0}")]
    InvalidFeed(String),
}

impl Error {
    /// Create an invalid feed error
    pub fn invalid_feed(msg: impl Into<String>) -> Self {
        Self::InvalidFeed(msg.into())
    }
}
