//! Configuration change events
//!
//! Every successful folder mutation produces one [`ConfigurationEvent`],
//! delivered to the receivers returned by [`crate::Config::subscribe`].

use crate::folders::{ConfigurationNode, FolderCategory};

/// Kind of change applied to a media folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEventType {
    Add,
    Update,
    Delete,
}

/// A media folder was added, edited or removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationEvent {
    pub event_type: ConfigEventType,
    /// Folder state after the change (before it, for deletions)
    pub node: ConfigurationNode,
    pub category: FolderCategory,
}

impl ConfigurationEvent {
    pub fn new(event_type: ConfigEventType, node: ConfigurationNode, category: FolderCategory) -> Self {
        Self {
            event_type,
            node,
            category,
        }
    }
}
