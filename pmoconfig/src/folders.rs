//! Media folders declared by the user
//!
//! Folders live under `media.folders.<category>` as YAML sequences of
//! `{id, label, path}` mappings. For podcasts, `path` holds the feed URL.
//!
//! Every mutation is saved to disk before the matching
//! [`ConfigurationEvent`](crate::ConfigurationEvent) is dispatched.

use crate::events::{ConfigEventType, ConfigurationEvent};
use crate::Config;
use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

/// Category of a configured root folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderCategory {
    Video,
    Audio,
    Picture,
    Podcast,
}

impl FolderCategory {
    pub const ALL: [FolderCategory; 4] = [
        FolderCategory::Video,
        FolderCategory::Audio,
        FolderCategory::Picture,
        FolderCategory::Podcast,
    ];

    /// Key of the category under `media.folders`
    pub fn key(&self) -> &'static str {
        match self {
            FolderCategory::Video => "video",
            FolderCategory::Audio => "audio",
            FolderCategory::Picture => "picture",
            FolderCategory::Podcast => "podcast",
        }
    }

    /// `true` when the folder path designates a local directory
    pub fn is_local(&self) -> bool {
        !matches!(self, FolderCategory::Podcast)
    }
}

impl fmt::Display for FolderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FolderCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        FolderCategory::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown folder category: {}", s))
    }
}

/// A root folder (or podcast feed) declared in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationNode {
    pub id: String,
    pub label: String,
    pub path: String,
}

impl ConfigurationNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
        }
    }
}

impl Config {
    fn folders_path(category: FolderCategory) -> [&'static str; 3] {
        ["media", "folders", category.key()]
    }

    fn read_folders(data: &Value, category: FolderCategory) -> Vec<ConfigurationNode> {
        match Self::get_value_internal(data, &Self::folders_path(category)) {
            Ok(value @ Value::Sequence(_)) => match serde_yaml::from_value(value) {
                Ok(nodes) => nodes,
                Err(e) => {
                    tracing::warn!(category = %category, "Malformed folder list: {}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Returns the folders declared for a category, in declaration order
    pub fn get_folders(&self, category: FolderCategory) -> Vec<ConfigurationNode> {
        let data = self.lock_data();
        Self::read_folders(&data, category)
    }

    /// Returns one folder by id
    pub fn get_folder(&self, category: FolderCategory, id: &str) -> Option<ConfigurationNode> {
        self.get_folders(category).into_iter().find(|n| n.id == id)
    }

    /// Finds a folder other than `excluded_id` sharing the label or the path
    pub fn find_folder(
        &self,
        category: FolderCategory,
        excluded_id: Option<&str>,
        label: &str,
        path: &str,
    ) -> Option<ConfigurationNode> {
        Self::find_in(&self.get_folders(category), excluded_id, label, path).cloned()
    }

    fn find_in<'a>(
        nodes: &'a [ConfigurationNode],
        excluded_id: Option<&str>,
        label: &str,
        path: &str,
    ) -> Option<&'a ConfigurationNode> {
        nodes.iter().find(|n| {
            excluded_id != Some(n.id.as_str()) && (n.label == label || n.path == path)
        })
    }

    fn validate_folder(
        nodes: &[ConfigurationNode],
        category: FolderCategory,
        excluded_id: Option<&str>,
        label: &str,
        path: &str,
    ) -> Result<()> {
        if label.is_empty() {
            bail!("Folder label is empty");
        }
        if path.is_empty() {
            bail!("Folder path is empty");
        }
        if category.is_local() {
            if !Path::new(path).is_dir() {
                bail!("{} is not a directory", path);
            }
        } else if !(path.starts_with("http://") || path.starts_with("https://")) {
            bail!("{} is not an http(s) URL", path);
        }
        if let Some(duplicate) = Self::find_in(nodes, excluded_id, label, path) {
            bail!(
                "A {} folder with the same label or path already exists ({})",
                category,
                duplicate.id
            );
        }
        Ok(())
    }

    /// Read, change, save and notify under a single lock of the data
    ///
    /// `change` returns the event to dispatch, or `None` to leave the
    /// folders untouched.
    fn update_folders<F>(&self, category: FolderCategory, change: F) -> Result<Option<ConfigurationNode>>
    where
        F: FnOnce(&mut Vec<ConfigurationNode>) -> Result<Option<(ConfigEventType, ConfigurationNode)>>,
    {
        let mut data = self.lock_data();
        let mut nodes = Self::read_folders(&data, category);
        let Some((event_type, node)) = change(&mut nodes)? else {
            return Ok(None);
        };

        Self::set_value_internal(&mut data, &Self::folders_path(category), serde_yaml::to_value(&nodes)?)?;
        self.save_data(&data)?;

        // Les événements partent dans l'ordre des écritures
        self.notify(ConfigurationEvent::new(event_type, node.clone(), category));
        Ok(Some(node))
    }

    /// Declares a new folder and notifies subscribers with an `Add` event
    pub fn add_folder(
        &self,
        category: FolderCategory,
        label: &str,
        path: &str,
    ) -> Result<ConfigurationNode> {
        let (label, path) = (label.trim(), path.trim());
        let node = self
            .update_folders(category, |nodes| {
                Self::validate_folder(nodes, category, None, label, path)?;
                let node = ConfigurationNode::new(Uuid::new_v4().to_string(), label, path);
                nodes.push(node.clone());
                Ok(Some((ConfigEventType::Add, node)))
            })?
            .ok_or_else(|| anyhow!("Folder {} was not added", label))?;

        tracing::info!(category = %category, node_id = %node.id, path = %node.path, "Folder added");
        Ok(node)
    }

    /// Changes the label and/or path of a folder
    ///
    /// Returns `None` when nothing changed; no event is sent in that case.
    pub fn edit_folder(
        &self,
        category: FolderCategory,
        id: &str,
        label: &str,
        path: &str,
    ) -> Result<Option<ConfigurationNode>> {
        let (label, path) = (label.trim(), path.trim());
        let node = self.update_folders(category, |nodes| {
            let Some(position) = nodes.iter().position(|n| n.id == id) else {
                bail!("Unknown {} folder: {}", category, id);
            };
            if nodes[position].label == label && nodes[position].path == path {
                return Ok(None);
            }
            Self::validate_folder(nodes, category, Some(id), label, path)?;

            let current = &mut nodes[position];
            current.label = label.to_string();
            current.path = path.to_string();
            Ok(Some((ConfigEventType::Update, current.clone())))
        })?;

        if let Some(node) = &node {
            tracing::info!(category = %category, node_id = %node.id, path = %node.path, "Folder updated");
        }
        Ok(node)
    }

    /// Removes a folder and notifies subscribers with a `Delete` event
    pub fn remove_folder(&self, category: FolderCategory, id: &str) -> Result<ConfigurationNode> {
        let node = self
            .update_folders(category, |nodes| {
                let Some(position) = nodes.iter().position(|n| n.id == id) else {
                    bail!("Unknown {} folder: {}", category, id);
                };
                Ok(Some((ConfigEventType::Delete, nodes.remove(position))))
            })?
            .ok_or_else(|| anyhow!("Unknown {} folder: {}", category, id))?;

        tracing::info!(category = %category, node_id = %node.id, "Folder removed");
        Ok(node)
    }
}
