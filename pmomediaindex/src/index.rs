//! In-memory media index
//!
//! Maps opaque node ids to the [`IndexEntry`] they were registered with.
//! The index itself never touches the filesystem, except for the periodic
//! [`MediaIndex::clean`] sweep which checks paths outside of the lock.

use crate::media_type::MediaType;
use crate::root::RootNode;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Record stored for each indexed node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub parent_id: String,
    pub media_type: MediaType,
    /// Filesystem path or feed/enclosure URL
    pub path: String,
    /// Display name override, otherwise the path basename
    pub name: Option<String>,
    /// Declared mime type (podcast entries)
    pub mime_type: Option<String>,
    /// Discovered by a scan rather than declared in the configuration
    pub ephemeral: bool,
}

impl IndexEntry {
    pub fn new(parent_id: impl Into<String>, media_type: MediaType, path: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            media_type,
            path: path.into(),
            name: None,
            mime_type: None,
            ephemeral: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    /// `true` when `path` is a URL rather than a local path
    pub fn is_remote(&self) -> bool {
        self.path.contains("://")
    }
}

/// Thread-safe id → entry store
#[derive(Debug, Default)]
pub struct MediaIndex {
    entries: RwLock<HashMap<String, IndexEntry>>,
}

impl MediaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, IndexEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, IndexEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deterministic id of an entry
    ///
    /// Derived from the parent id, media type, path and name only: the same
    /// file seen twice under the same parent always gets the same id.
    pub fn node_id(entry: &IndexEntry) -> String {
        let mut hasher = Sha256::new();
        hasher.update(entry.parent_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.media_type.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.path.as_bytes());
        hasher.update([0u8]);
        match &entry.name {
            Some(name) => {
                hasher.update([1u8]);
                hasher.update(name.as_bytes());
            }
            None => hasher.update([0u8]),
        }
        let result = hasher.finalize();
        hex::encode(&result[..16]) // 16 octets = 32 caractères hex
    }

    pub fn get(&self, id: &str) -> Option<IndexEntry> {
        self.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().contains_key(id)
    }

    /// Inserts or overwrites the entry stored under `id`
    pub fn put(&self, id: impl Into<String>, entry: IndexEntry) {
        self.write().insert(id.into(), entry);
    }

    /// Registers an entry under its deterministic id
    ///
    /// An existing entry with the same id is kept as is.
    pub fn add(&self, entry: IndexEntry) -> String {
        let id = Self::node_id(&entry);
        self.write().entry(id.clone()).or_insert(entry);
        id
    }

    /// Registers an entry under a fresh random id
    pub fn add_unique(&self, entry: IndexEntry) -> String {
        let id = Uuid::new_v4().to_string();
        self.write().insert(id.clone(), entry);
        id
    }

    pub fn remove(&self, id: &str) -> Option<IndexEntry> {
        self.write().remove(id)
    }

    /// Removes `id` and all of its descendants, returning how many entries went
    pub fn remove_subtree(&self, id: &str) -> usize {
        let mut entries = self.write();
        let removed = Self::remove_descendants(&mut entries, id) + usize::from(entries.remove(id).is_some());
        if removed > 0 {
            tracing::debug!(node_id = %id, removed, "Removed subtree from media index");
        }
        removed
    }

    /// Removes every descendant of `id`, keeping `id` itself
    pub fn remove_children(&self, id: &str) -> usize {
        let mut entries = self.write();
        Self::remove_descendants(&mut entries, id)
    }

    fn remove_descendants(entries: &mut HashMap<String, IndexEntry>, id: &str) -> usize {
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for (child_id, entry) in entries.iter() {
            children
                .entry(entry.parent_id.as_str())
                .or_default()
                .push(child_id.as_str());
        }

        // Parcours en largeur ; `visited` protège contre les cycles
        let mut visited: HashSet<&str> = HashSet::from([id]);
        let mut queue: VecDeque<&str> = VecDeque::from([id]);
        let mut doomed: Vec<String> = Vec::new();
        while let Some(current) = queue.pop_front() {
            for &child in children.get(current).into_iter().flatten() {
                if visited.insert(child) {
                    doomed.push(child.to_string());
                    queue.push_back(child);
                }
            }
        }

        for child in &doomed {
            entries.remove(child);
        }
        doomed.len()
    }

    /// Sweeps stale ephemeral entries
    ///
    /// Removes ephemeral local entries whose path no longer exists (with
    /// their descendants), then ephemeral entries whose parent is gone,
    /// until no orphan remains. Entries declared in the configuration are
    /// never swept.
    pub fn clean(&self) -> usize {
        let local: Vec<(String, String)> = self
            .read()
            .iter()
            .filter(|(_, entry)| entry.ephemeral && !entry.is_remote())
            .map(|(id, entry)| (id.clone(), entry.path.clone()))
            .collect();

        // Accès disque hors verrou
        let missing: Vec<String> = local
            .into_iter()
            .filter(|(_, path)| !Path::new(path).exists())
            .map(|(id, _)| id)
            .collect();

        let mut entries = self.write();
        let mut removed = 0;
        for id in &missing {
            if entries.remove(id).is_some() {
                removed += 1 + Self::remove_descendants(&mut entries, id);
            }
        }

        loop {
            let orphans: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| {
                    entry.ephemeral
                        && !RootNode::is_root_id(&entry.parent_id)
                        && !entries.contains_key(&entry.parent_id)
                })
                .map(|(id, _)| id.clone())
                .collect();
            if orphans.is_empty() {
                break;
            }
            for id in &orphans {
                entries.remove(id);
            }
            removed += orphans.len();
        }

        if removed > 0 {
            tracing::info!(removed, remaining = entries.len(), "Media index cleaned");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(parent: &str, path: &str) -> IndexEntry {
        IndexEntry::new(parent, MediaType::Video, path).ephemeral()
    }

    #[test]
    fn test_add_is_idempotent() {
        let index = MediaIndex::new();
        let first = index.add(file("v1", "/media/movies/movie.avi"));
        let second = index.add(file("v1", "/media/movies/movie.avi"));
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_add_discriminates_every_field() {
        let base = file("v1", "/media/movies/movie.avi");
        let ids: HashSet<String> = [
            base.clone().named("name1"),
            base.clone().named("name2"),
            base.clone(),
            file("v2", "/media/movies/movie.avi"),
            file("v1", "/media/movies/other.avi"),
            IndexEntry::new("v1", MediaType::Audio, "/media/movies/movie.avi"),
        ]
        .iter()
        .map(MediaIndex::node_id)
        .collect();
        assert_eq!(ids.len(), 6);
        // Le type MIME et le flag éphémère ne participent pas à l'identité
        assert_eq!(
            MediaIndex::node_id(&base),
            MediaIndex::node_id(&base.clone().with_mime_type("video/x-msvideo"))
        );
    }

    #[test]
    fn test_put_overwrites_and_add_keeps() {
        let index = MediaIndex::new();
        index.put("v1", IndexEntry::new("1_VIDEOS", MediaType::Video, "/a").named("A"));
        index.put("v1", IndexEntry::new("1_VIDEOS", MediaType::Video, "/b").named("B"));
        assert_eq!(index.get("v1").unwrap().path, "/b");

        let entry = file("v1", "/b/movie.avi");
        let id = index.add(entry.clone());
        index.add(entry.with_mime_type("video/x-msvideo"));
        assert_eq!(index.get(&id).unwrap().mime_type, None);
    }

    #[test]
    fn test_remove_subtree_cascades() {
        let index = MediaIndex::new();
        index.put("x", IndexEntry::new("1_VIDEOS", MediaType::Video, "/x"));
        let y = index.add(file("x", "/x/y"));
        let z = index.add(file(&y, "/x/y/z.avi"));
        let other = index.add(file("w", "/w/other.avi"));

        assert_eq!(index.remove_subtree("x"), 3);
        assert!(index.get("x").is_none());
        assert!(index.get(&y).is_none());
        assert!(index.get(&z).is_none());
        assert!(index.get(&other).is_some());
    }

    #[test]
    fn test_remove_subtree_survives_cycles() {
        let index = MediaIndex::new();
        index.put("a", file("b", "/a"));
        index.put("b", file("a", "/b"));
        index.put("c", file("c", "/c"));
        assert_eq!(index.remove_subtree("a"), 2);
        assert_eq!(index.remove_subtree("c"), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_children_keeps_parent() {
        let index = MediaIndex::new();
        index.put("p", IndexEntry::new("4_PODCASTS", MediaType::Podcast, "http://x/rss"));
        index.add_unique(file("p", "http://x/1.mp3"));
        index.add_unique(file("p", "http://x/2.mp3"));
        assert_eq!(index.remove_children("p"), 2);
        assert_eq!(index.len(), 1);
        assert!(index.contains("p"));
    }

    #[test]
    fn test_clean_sweeps_missing_paths_and_orphans() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("kept.avi");
        std::fs::write(&kept, b"x").unwrap();
        let root = dir.path().to_string_lossy().to_string();

        let index = MediaIndex::new();
        index.put("v1", IndexEntry::new("1_VIDEOS", MediaType::Video, &root));
        // Les entrées de configuration ne sont jamais balayées
        index.put("v2", IndexEntry::new("1_VIDEOS", MediaType::Video, "/gone/config"));
        let kept_id = index.add(file("v1", &kept.to_string_lossy()));
        let gone_dir = index.add(file("v1", &format!("{}/gone", root)));
        let gone_child = index.add(file(&gone_dir, "http://example.com/remote.mp3"));
        let orphan = index.add(file("deleted", "http://example.com/orphan.mp3"));
        let orphan_child = index.add(file(&orphan, "http://example.com/orphan2.mp3"));

        assert_eq!(index.clean(), 4);
        assert!(index.contains("v1"));
        assert!(index.contains("v2"));
        assert!(index.contains(&kept_id));
        for id in [&gone_dir, &gone_child, &orphan, &orphan_child] {
            assert!(!index.contains(id));
        }
        assert_eq!(index.clean(), 0);
    }
}
