//! Editor configuration
//!
//! Settings are stored as RON and every section falls back to its defaults,
//! so partial files are accepted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shaper_cad::{ExtrudeSettings, SketchSettings};
use shaper_core::RecordOptions;
use shaper_core::constants::{DEFAULT_HISTORY_LIMIT, DEFAULT_SPAWN_EXTENT};

/// Undo history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept
    pub limit: usize,
    /// Keep the source shape of extruded objects in snapshots and exported
    /// documents, so they survive undo, redo and import
    pub persist_extrusions: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            persist_extrusions: false,
        }
    }
}

impl HistoryConfig {
    /// Export-record options implied by this config
    pub fn record_options(&self) -> RecordOptions {
        RecordOptions {
            persist_extrusions: self.persist_extrusions,
        }
    }
}

/// Primitive placement configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrimitiveConfig {
    /// New primitives land within +/- this distance of the origin on each
    /// axis (0 places them at the origin)
    pub spawn_extent: f32,
}

impl Default for PrimitiveConfig {
    fn default() -> Self {
        Self {
            spawn_extent: DEFAULT_SPAWN_EXTENT,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub sketch: SketchSettings,
    pub extrude: ExtrudeSettings,
    pub primitives: PrimitiveConfig,
    pub history: HistoryConfig,
}

impl EditorConfig {
    /// Parse a RON config
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    /// Serialize as pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load config from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron(&content)
    }

    /// Save config to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// Owns the active config and the file it came from
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: EditorConfig,
    path: Option<PathBuf>,
}

impl ConfigManager {
    /// Wrap an in-memory config with no backing file
    pub fn new(config: EditorConfig) -> Self {
        Self { config, path: None }
    }

    /// Load from a file, falling back to defaults if it does not exist
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = if path.exists() {
            EditorConfig::load(&path)?
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            EditorConfig::default()
        };
        Ok(Self {
            config,
            path: Some(path),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Restore every setting to its default
    pub fn reset_to_defaults(&mut self) {
        self.config = EditorConfig::default();
    }

    /// Write the config back to its file
    pub fn save(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => self.config.save(path),
            None => Err(ConfigError::NoPath),
        }
    }
}

/// Config-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Config has no file path")]
    NoPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ron_round_trip() {
        let mut config = EditorConfig::default();
        config.sketch.close_threshold = 1.0;
        config.history.persist_extrusions = true;

        let ron = config.to_ron().unwrap();
        assert_eq!(EditorConfig::from_ron(&ron).unwrap(), config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EditorConfig::from_ron("(primitives: (spawn_extent: 0.0))").unwrap();
        assert_eq!(config.primitives.spawn_extent, 0.0);
        assert_eq!(config.sketch, SketchSettings::default());
        assert_eq!(config.history.limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_manager_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaper.ron");

        let mut manager = ConfigManager::load_or_default(&path).unwrap();
        assert_eq!(manager.config(), &EditorConfig::default());

        manager.config_mut().extrude.default_height = 5.0;
        manager.save().unwrap();

        let reloaded = ConfigManager::load_or_default(&path).unwrap();
        assert_eq!(reloaded.config().extrude.default_height, 5.0);

        manager.reset_to_defaults();
        assert_eq!(manager.config(), &EditorConfig::default());
    }

    #[test]
    fn test_in_memory_manager_cannot_save() {
        let manager = ConfigManager::new(EditorConfig::default());
        assert_eq!(manager.save(), Err(ConfigError::NoPath));
    }

    #[test]
    fn test_invalid_ron() {
        assert!(matches!(
            EditorConfig::from_ron("(sketch: 3"),
            Err(ConfigError::Deserialize(_))
        ));
    }
}
