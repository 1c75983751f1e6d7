//! # pmopodcast - Podcast feeds for PMOMedia
//!
//! This crate downloads and parses podcast feeds and keeps parsed feeds in
//! a bounded cache.
//!
//! ## Features
//!
//! - **HTTP client**: [`PodcastClient`] fetches a feed with a configurable timeout
//! - **Parser**: [`parse_feed`] reads RSS 2.0 and Atom documents, one
//!   [`FeedEntry`] per enclosure
//! - **Cache**: [`FeedCache`] coalesces concurrent fetches of the same URL,
//!   expires values after a TTL and evicts least recently used feeds
//!
//! ## Quick Start
//!
//! ```no_run
//! use pmopodcast::{FeedCache, FeedFetcher, PodcastClient};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(PodcastClient::new()?);
//! let cache = FeedCache::new(Duration::from_secs(2 * 3600), 50);
//!
//! let url = "https://example.com/feed.xml";
//! let fetcher = client.clone();
//! let entries = cache
//!     .get_or_fetch(url, move || async move { fetcher.fetch_feed(url).await })
//!     .await?;
//! println!("{} entries", entries.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod error;
pub mod models;
pub mod parser;

pub use cache::{FeedCache, SharedResult};
pub use client::{ClientBuilder, FeedFetcher, PodcastClient, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use error::{Error, Result};
pub use models::FeedEntry;
pub use parser::parse_feed;
