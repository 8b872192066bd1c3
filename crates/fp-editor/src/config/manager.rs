//! Persistent editor configuration backed by a RON file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use super::AppConfig;

/// Shared configuration manager type
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// Written by a newer editor than this one
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Owns the editor configuration and the file it is persisted to
#[derive(Debug)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Create a new configuration manager, loading from disk if available
    pub fn new() -> Self {
        Self::with_path(Self::default_path())
    }

    /// Create a configuration manager backed by a specific file.
    ///
    /// A missing or unreadable file is not fatal: the editor starts from
    /// defaults and the problem is logged.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let config = match Self::load(&config_path) {
            Ok(Some(config)) => {
                tracing::info!("Loaded config from {:?}", config_path);
                config
            }
            Ok(None) => {
                tracing::info!("No config file at {:?}, using defaults", config_path);
                AppConfig::new()
            }
            Err(e) => {
                tracing::warn!("Ignoring config file {:?}: {}", config_path, e);
                AppConfig::new()
            }
        };

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    /// `<os config dir>/fp-editor/config.ron`
    fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fp-editor")
            .join("config.ron")
    }

    /// Read a configuration file; `Ok(None)` when it does not exist
    pub fn load(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::Io(e.to_string())),
        }
    }

    /// Parse a RON configuration document, rejecting newer format versions
    pub fn parse(content: &str) -> Result<AppConfig, ConfigError> {
        let config: AppConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        if config.version > AppConfig::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: AppConfig::CURRENT_VERSION,
            });
        }
        Ok(config)
    }

    /// Re-read the backing file, discarding unsaved changes.
    ///
    /// On error the in-memory configuration is kept.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.config = Self::load(&self.config_path)?.unwrap_or_else(AppConfig::new);
        self.dirty = false;
        tracing::debug!("Reloaded config from {:?}", self.config_path);
        Ok(())
    }

    /// Get a reference to the current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut AppConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Check if the configuration has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the configuration to disk
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        // Ensure config directory exists
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::new();
        self.dirty = true;
    }

    /// Get the config file path (for display purposes)
    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new shared configuration manager
pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("fp-editor-test-{}", uuid::Uuid::new_v4()))
            .join("config.ron")
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let manager = ConfigManager::with_path(temp_config_path());
        assert_eq!(manager.config(), &AppConfig::new());
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_config_path();

        let mut manager = ConfigManager::with_path(&path);
        manager.config_mut().snap.snap_distance = 25.0;
        manager.config_mut().drawing.continuous_by_default = true;
        assert!(manager.is_dirty());
        manager.save().unwrap();
        assert!(!manager.is_dirty());

        let reloaded = ConfigManager::with_path(&path);
        assert_eq!(reloaded.config().snap.snap_distance, 25.0);
        assert!(reloaded.config().drawing.continuous_by_default);
        assert_eq!(reloaded.config_file_path(), path.as_path());

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_reset_marks_dirty() {
        let mut manager = ConfigManager::with_path(temp_config_path());
        manager.config_mut().snap.enabled = false;
        manager.reset_to_defaults();
        assert!(manager.config().snap.enabled);
        assert!(manager.is_dirty());
    }

    #[test]
    fn test_unparseable_config() {
        assert!(matches!(
            ConfigManager::parse("not ron at all ("),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        assert_eq!(
            ConfigManager::parse("(version: 99)"),
            Err(ConfigError::UnsupportedVersion {
                found: 99,
                supported: AppConfig::CURRENT_VERSION,
            })
        );
    }

    #[test]
    fn test_load_missing_and_broken_files() {
        let path = temp_config_path();
        assert_eq!(ConfigManager::load(&path), Ok(None));

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(&path, "(version: 1, snap: (").unwrap();
        assert!(matches!(
            ConfigManager::load(&path),
            Err(ConfigError::Deserialize(_))
        ));

        // A broken file falls back to defaults without marking anything dirty
        let manager = ConfigManager::with_path(&path);
        assert_eq!(manager.config(), &AppConfig::new());
        assert!(!manager.is_dirty());

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_reload_discards_unsaved_changes() {
        let path = temp_config_path();
        let mut manager = ConfigManager::with_path(&path);
        manager.config_mut().snap.grid_size = 40.0;
        manager.save().unwrap();

        manager.config_mut().snap.grid_size = 5.0;
        manager.reload().unwrap();
        assert_eq!(manager.config().snap.grid_size, 40.0);
        assert!(!manager.is_dirty());

        std::fs::write(&path, "garbage").unwrap();
        manager.config_mut().snap.grid_size = 7.0;
        assert!(manager.reload().is_err());
        assert_eq!(manager.config().snap.grid_size, 7.0);

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_shared_config() {
        let shared: SharedConfig = Arc::new(RwLock::new(ConfigManager::with_path(
            temp_config_path(),
        )));
        shared.write().config_mut().snap.grid_size = 10.0;
        assert_eq!(shared.read().config().snap.grid_size, 10.0);
    }
}
