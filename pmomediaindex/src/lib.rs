//! # pmomediaindex - Media tree of PMOMedia
//!
//! This crate maps the media folders and podcasts declared in the
//! configuration to a browsable tree of nodes:
//!
//! - [`MediaIndex`]: thread-safe id → entry store, with deterministic ids
//! - [`MediaManager::resolve`]: turns an id back into a [`MediaNode`]
//! - [`MediaManager::children`]: lists a node's children, registering what
//!   it discovers and filtering by device mime types
//! - [`PodcastFeedCache`]: single-flight, time and size bounded feed cache
//! - [`ReconciliationListener`]: applies configuration changes to the index
//! - [`MediaManager::scan_all`]: warms the index by walking the tree
//! - [`MediaSchedulers`]: periodic rescan and cleanup timers
//!
//! ## Usage
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmomediaindex::{MediaManager, ReconciliationListener};
//!
//! # async fn run() -> pmomediaindex::Result<()> {
//! let config = get_config();
//! let manager = MediaManager::from_config(config.clone())?;
//! ReconciliationListener::new(manager.clone()).spawn(config.subscribe());
//!
//! manager.scan_all().await;
//! if let Some(root) = manager.resolve("0").await {
//!     for child in manager.children(&root, None).await {
//!         println!("{} ({})", child.name(), child.id());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config_ext;
pub mod device;
mod enumerator;
pub mod error;
pub mod index;
pub mod manager;
pub mod media_type;
pub mod mime;
pub mod node;
pub mod playlist;
pub mod podcast;
pub mod reconcile;
mod resolver;
pub mod root;
pub mod scan;
pub mod scheduler;

pub use config_ext::MediaConfigExt;
pub use device::{Device, DeviceProfile};
pub use error::{MediaError, Result};
pub use index::{IndexEntry, MediaIndex};
pub use manager::MediaManager;
pub use media_type::MediaType;
pub use mime::{mime_type_of, MimeType};
pub use node::{ContentNode, FolderNode, MediaNode, PlaylistNode, PodcastEntryNode, PodcastNode};
pub use playlist::{parse_m3u, read_playlist, PlaylistEntry, PlaylistLine};
pub use podcast::{PodcastEntries, PodcastFeedCache};
pub use reconcile::ReconciliationListener;
pub use root::RootNode;
pub use scan::ScanStats;
pub use scheduler::MediaSchedulers;
