//! HTTP client for podcast feeds
//!
//! # Example
//!
//! ```no_run
//! use pmopodcast::{FeedFetcher, PodcastClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PodcastClient::new()?;
//!     for entry in client.fetch_feed("https://example.com/feed.xml").await? {
//!         println!("{} -> {}", entry.title, entry.url);
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::FeedEntry;
use crate::parser::parse_feed;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "PMOMedia/0.1.0 (pmopodcast)";

/// Source of parsed feeds
///
/// The media index only depends on this trait, so that tests can swap the
/// network for counting or failing fakes.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Downloads and parses the feed at `url`
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>>;
}

/// Podcast HTTP client
///
/// The client is stateless and does not cache responses; caching belongs
/// to [`FeedCache`](crate::FeedCache).
#[derive(Debug, Clone)]
pub struct PodcastClient {
    client: Client,
    timeout: Duration,
}

impl PodcastClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with a custom reqwest::Client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl FeedFetcher for PodcastClient {
    async fn fetch_feed(&self, url: &str) -> Result<Vec<FeedEntry>> {
        tracing::debug!(feed_url = %url, "Fetching podcast feed");

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        let entries = parse_feed(&body)?;

        tracing::debug!(feed_url = %url, entries = entries.len(), "Feed fetched");
        Ok(entries)
    }
}

/// Builder for [`PodcastClient`]
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PodcastClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(PodcastClient {
            client,
            timeout: self.timeout,
        })
    }
}
