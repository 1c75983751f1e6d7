//! # PMOMedia Configuration Module
//!
//! This module provides configuration management for PMOMedia, including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Media folder management (video, audio, picture and podcast roots)
//! - Change notification through explicit channels ([`Config::subscribe`])
//!
//! ## Usage
//!
//! ```no_run
//! use pmoconfig::{get_config, FolderCategory};
//!
//! // Get the global configuration
//! let config = get_config();
//!
//! // Declare a new video folder
//! let node = config.add_folder(FolderCategory::Video, "Movies", "/media/movies")?;
//! println!("New folder id: {}", node.id);
//!
//! // Access configuration values
//! let level = config.get_log_min_level()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::mpsc;
use tracing::info;

mod events;
mod folders;

pub use events::{ConfigEventType, ConfigurationEvent};
pub use folders::{ConfigurationNode, FolderCategory};

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pmomedia.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load PMOMedia configuration"));
}

const ENV_CONFIG_DIR: &str = "PMOMEDIA_CONFIG";
const ENV_PREFIX: &str = "PMOMEDIA_CONFIG__";

// Default values for configuration
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Macro to generate getter/setter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> anyhow::Result<bool> {
            match self.get_value($path) {
                Ok(serde_yaml::Value::Bool(b)) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> anyhow::Result<()> {
            self.set_value($path, serde_yaml::Value::Bool(value))
        }
    };
}

/// Configuration manager for PMOMedia
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters/setters for configuration values
/// - Notifying subscribers when media folders change
///
/// # Examples
///
/// ```no_run
/// use pmoconfig::get_config;
///
/// let config = get_config();
/// let console = config.get_log_enable_console()?;
/// println!("Console logging: {}", console);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<ConfigurationEvent>>>,
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(".pmomedia").exists() {
            return ".pmomedia".to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(".pmomedia");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        ".pmomedia".to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        // Create if doesn't exist
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        // Verify it's a directory
        if !path.is_dir() {
            return Err(anyhow!("{} is not a directory", path.display()));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        // Test read permission
        fs::read_dir(path)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `PMOMEDIA_CONFIG` environment variable
    /// 3. `.pmomedia` in the current directory
    /// 4. `.pmomedia` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for read/write permissions.
    pub fn config_dir(directory: &str) -> Result<String> {
        let dir_path = Self::find_config_dir(directory);
        Self::validate_config_dir(Path::new(&dir_path))?;
        Ok(dir_path)
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory containing the config.yaml file, or empty to use defaults
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory)?;
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file=%path, "Loaded config file");
            data
        } else {
            info!(config_file=%path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        // Merger avec la config par défaut
        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        merge_yaml(&mut default_value, &external_value);
        let mut config_value = Self::lower_keys_value(default_value);

        // Appliquer les overrides depuis les variables d'environnement
        Self::apply_env_overrides(&mut config_value);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
            subscribers: Mutex::new(Vec::new()),
        };

        config.save()?;
        Ok(config)
    }

    /// Returns the directory holding `config.yaml`
    pub fn directory(&self) -> &str {
        &self.config_dir
    }

    pub(crate) fn lock_data(&self) -> MutexGuard<'_, Value> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let data = self.lock_data();
        self.save_data(&data)
    }

    /// Writes `data` to config.yaml; the caller holds the data lock
    pub(crate) fn save_data(&self, data: &Value) -> Result<()> {
        let yaml = serde_yaml::to_string(data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["media", "scan_all_delay_minutes"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        {
            let mut data = self.lock_data();
            Self::set_value_internal(&mut data, path, value)?;
        }
        self.save()
    }

    pub(crate) fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = path[0].to_lowercase();
            let key_value = Value::String(key);
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// Returns an error if the path doesn't exist.
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.lock_data();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                let key_path = key
                    .trim_start_matches(ENV_PREFIX)
                    .split("__")
                    .collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        let new_key = Value::String(s.to_lowercase());
                        let new_val = Self::lower_keys_value(v);
                        new_map.insert(new_key, new_val);
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Opens a new channel receiving every media folder change
    ///
    /// Each subscriber gets its own receiver; events are delivered in the
    /// order the configuration was saved. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ConfigurationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    pub(crate) fn notify(&self, event: ConfigurationEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(
            event = ?event.event_type,
            node_id = %event.node.id,
            category = %event.category,
            subscribers = subscribers.len(),
            "Dispatching configuration event"
        );
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["host", "logger", "min_level"]) {
            Ok(Value::String(s)) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    /// Définit le niveau de log minimum dans la configuration
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }

    /// Reads an unsigned integer, persisting `default` when the key is missing or invalid
    pub fn get_u64_or_init(&self, path: &[&str], default: u64) -> Result<u64> {
        match self.get_value(path) {
            Ok(Value::Number(n)) if n.is_u64() => Ok(n.as_u64().unwrap_or(default)),
            Ok(Value::String(s)) => match s.trim().parse::<u64>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(key = %path.join("."), value = %s, "Invalid number, using default {}", default);
                    self.set_value(path, Value::Number(Number::from(default)))?;
                    Ok(default)
                }
            },
            _ => {
                self.set_value(path, Value::Number(Number::from(default)))?;
                Ok(default)
            }
        }
    }

    /// Reads a boolean, persisting `default` when the key is missing or invalid
    pub fn get_bool_or_init(&self, path: &[&str], default: bool) -> Result<bool> {
        match self.get_value(path) {
            Ok(Value::Bool(b)) => Ok(b),
            _ => {
                self.set_value(path, Value::Bool(default))?;
                Ok(default)
            }
        }
    }
}

/// Returns the global configuration instance
///
/// This function provides access to the singleton configuration instance,
/// which is lazily loaded on first access.
///
/// # Examples
///
/// ```no_run
/// use pmoconfig::get_config;
///
/// let config = get_config();
/// let level = config.get_log_min_level();
/// ```
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings (objects), it merges keys from external into default
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_yaml_replaces_scalars_and_keeps_defaults() {
        let mut default: Value =
            serde_yaml::from_str("media:\n  a: 1\n  b: 2\n  folders:\n    video: []\n").unwrap();
        let external: Value = serde_yaml::from_str("media:\n  b: 5\n  c: 7\n").unwrap();
        merge_yaml(&mut default, &external);

        let media = &default["media"];
        assert_eq!(media["a"], Value::Number(1.into()));
        assert_eq!(media["b"], Value::Number(5.into()));
        assert_eq!(media["c"], Value::Number(7.into()));
        assert!(media["folders"]["video"].is_sequence());
    }

    #[test]
    fn test_get_set_value_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        config
            .set_value(&["Media", "Custom"], Value::Number(42.into()))
            .unwrap();
        // Les clés sont normalisées en minuscules
        assert_eq!(
            config.get_value(&["media", "custom"]).unwrap(),
            Value::Number(42.into())
        );
        assert!(config.get_value(&["media", "missing"]).is_err());
    }

    #[test]
    fn test_defaults_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();

        assert_eq!(
            config
                .get_u64_or_init(&["media", "brand_new_key"], 12)
                .unwrap(),
            12
        );
        let saved = fs::read_to_string(dir.path().join("config.yaml")).unwrap();
        assert!(saved.contains("brand_new_key: 12"));
    }

    #[test]
    fn test_reload_keeps_saved_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        {
            let config = Config::load_config(path).unwrap();
            config.set_log_min_level("DEBUG".to_string()).unwrap();
        }
        let config = Config::load_config(path).unwrap();
        assert_eq!(config.get_log_min_level().unwrap(), "DEBUG");
        assert!(config.get_log_enable_console().unwrap());
    }
}
