//! Extension pour intégrer l'index média dans pmoconfig
//!
//! Ce module fournit le trait `MediaConfigExt` qui ajoute à
//! `pmoconfig::Config` les paramètres de l'index média.
//!
//! # Exemple
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmomediaindex::MediaConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//!
//! if config.get_enable_external_subtitles()? {
//!     println!("Subtitles are listed next to videos");
//! }
//! println!("Podcast TTL: {}h", config.get_podcast_cache_expire_hours()?);
//! # Ok(())
//! # }
//! ```

use crate::root::RootNode;
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::{Number, Value};

pub const DEFAULT_ENABLE_EXTERNAL_SUBTITLES: bool = true;
pub const DEFAULT_PREPEND_PODCAST_ENTRY_NAME: bool = false;
pub const DEFAULT_SCAN_ALL_DELAY_MINUTES: u64 = 0;
pub const DEFAULT_INDEX_CLEAN_DELAY_MINUTES: u64 = 15;
pub const DEFAULT_PODCAST_CACHE_MAX_ELEMENTS: u64 = 50;
pub const DEFAULT_PODCAST_CACHE_EXPIRE_HOURS: u64 = 2;
pub const DEFAULT_PODCAST_CACHE_CLEAN_DELAY_MINUTES: u64 = 60;
pub const DEFAULT_PODCAST_FETCH_TIMEOUT_SECS: u64 = pmopodcast::DEFAULT_REQUEST_TIMEOUT_SECS;

/// Trait d'extension pour les paramètres de l'index média
///
/// # Auto-persist des valeurs par défaut
///
/// Les getters persistent automatiquement les valeurs par défaut dans la
/// configuration si elles n'existent pas encore.
pub trait MediaConfigExt {
    // ========================================================================
    // Contenu
    // ========================================================================

    /// Sous-titres externes listés à côté des vidéos (défaut: `true`)
    fn get_enable_external_subtitles(&self) -> Result<bool>;
    fn set_enable_external_subtitles(&self, enabled: bool) -> Result<()>;

    /// Préfixe les épisodes par le nom du podcast (défaut: `false`)
    fn get_prepend_podcast_entry_name(&self) -> Result<bool>;
    fn set_prepend_podcast_entry_name(&self, enabled: bool) -> Result<()>;

    /// Libellé localisé d'une racine
    ///
    /// Stocké sous `media.labels.<bundle key>`.
    fn get_root_label(&self, root: RootNode) -> Result<String>;
    fn set_root_label(&self, root: RootNode, label: &str) -> Result<()>;

    // ========================================================================
    // Tâches planifiées (minutes, 0 = désactivé)
    // ========================================================================

    fn get_scan_all_delay_minutes(&self) -> Result<u64>;
    fn get_index_clean_delay_minutes(&self) -> Result<u64>;
    fn get_podcast_cache_clean_delay_minutes(&self) -> Result<u64>;

    // ========================================================================
    // Cache des podcasts
    // ========================================================================

    fn get_podcast_cache_max_elements(&self) -> Result<u64>;
    fn get_podcast_cache_expire_hours(&self) -> Result<u64>;
    fn get_podcast_fetch_timeout_secs(&self) -> Result<u64>;
}

impl MediaConfigExt for Config {
    fn get_enable_external_subtitles(&self) -> Result<bool> {
        self.get_bool_or_init(
            &["media", "enable_external_subtitles"],
            DEFAULT_ENABLE_EXTERNAL_SUBTITLES,
        )
    }

    fn set_enable_external_subtitles(&self, enabled: bool) -> Result<()> {
        self.set_value(&["media", "enable_external_subtitles"], Value::Bool(enabled))
    }

    fn get_prepend_podcast_entry_name(&self) -> Result<bool> {
        self.get_bool_or_init(
            &["media", "prepend_podcast_entry_name"],
            DEFAULT_PREPEND_PODCAST_ENTRY_NAME,
        )
    }

    fn set_prepend_podcast_entry_name(&self, enabled: bool) -> Result<()> {
        self.set_value(&["media", "prepend_podcast_entry_name"], Value::Bool(enabled))
    }

    fn get_root_label(&self, root: RootNode) -> Result<String> {
        let key = root.bundle_key();
        match self.get_value(&["media", "labels", key.as_str()]) {
            Ok(Value::String(label)) if !label.trim().is_empty() => Ok(label),
            _ => {
                self.set_root_label(root, root.default_label())?;
                Ok(root.default_label().to_string())
            }
        }
    }

    fn set_root_label(&self, root: RootNode, label: &str) -> Result<()> {
        let key = root.bundle_key();
        self.set_value(&["media", "labels", key.as_str()], Value::String(label.to_string()))
    }

    fn get_scan_all_delay_minutes(&self) -> Result<u64> {
        self.get_u64_or_init(&["media", "scan_all_delay_minutes"], DEFAULT_SCAN_ALL_DELAY_MINUTES)
    }

    fn get_index_clean_delay_minutes(&self) -> Result<u64> {
        self.get_u64_or_init(
            &["media", "index_clean_delay_minutes"],
            DEFAULT_INDEX_CLEAN_DELAY_MINUTES,
        )
    }

    fn get_podcast_cache_clean_delay_minutes(&self) -> Result<u64> {
        self.get_u64_or_init(
            &["media", "podcast", "cache_clean_delay_minutes"],
            DEFAULT_PODCAST_CACHE_CLEAN_DELAY_MINUTES,
        )
    }

    fn get_podcast_cache_max_elements(&self) -> Result<u64> {
        self.get_u64_or_init(
            &["media", "podcast", "cache_max_elements"],
            DEFAULT_PODCAST_CACHE_MAX_ELEMENTS,
        )
    }

    fn get_podcast_cache_expire_hours(&self) -> Result<u64> {
        self.get_u64_or_init(
            &["media", "podcast", "cache_expire_hours"],
            DEFAULT_PODCAST_CACHE_EXPIRE_HOURS,
        )
    }

    fn get_podcast_fetch_timeout_secs(&self) -> Result<u64> {
        match self.get_value(&["media", "podcast", "fetch_timeout_secs"]) {
            // 0 n'est pas un délai valide
            Ok(Value::Number(n)) if n.as_u64().is_some_and(|secs| secs > 0) => {
                Ok(n.as_u64().unwrap_or(DEFAULT_PODCAST_FETCH_TIMEOUT_SECS))
            }
            _ => {
                self.set_value(
                    &["media", "podcast", "fetch_timeout_secs"],
                    Value::Number(Number::from(DEFAULT_PODCAST_FETCH_TIMEOUT_SECS)),
                )?;
                Ok(DEFAULT_PODCAST_FETCH_TIMEOUT_SECS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert!(config.get_enable_external_subtitles().unwrap());
        assert!(!config.get_prepend_podcast_entry_name().unwrap());
        assert_eq!(config.get_scan_all_delay_minutes().unwrap(), 0);
        assert_eq!(config.get_index_clean_delay_minutes().unwrap(), 15);
        assert_eq!(config.get_podcast_cache_max_elements().unwrap(), 50);
        assert_eq!(config.get_podcast_cache_expire_hours().unwrap(), 2);
        assert_eq!(config.get_podcast_cache_clean_delay_minutes().unwrap(), 60);
        assert_eq!(config.get_podcast_fetch_timeout_secs().unwrap(), 30);
    }

    #[test]
    fn test_root_labels_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        {
            let config = Config::load_config(path).unwrap();
            assert_eq!(config.get_root_label(RootNode::Video).unwrap(), "Videos");
            config.set_root_label(RootNode::Audio, "Musique").unwrap();
        }
        let config = Config::load_config(path).unwrap();
        assert_eq!(config.get_root_label(RootNode::Audio).unwrap(), "Musique");
        assert_eq!(config.get_root_label(RootNode::Podcast).unwrap(), "Podcasts");
    }
}
