use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Runtime configuration for opening an [`Inventory`](crate::core::Inventory).
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
    pub thresholds: FreshnessThresholds,
}

impl Config {
    /// Configuration with default thresholds.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            thresholds: FreshnessThresholds::default(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("galley.redb")
    }
}

/// Day thresholds for the freshness classifier, persisted as config.toml.
///
/// A product is `Critical` at `critical_days` or fewer days out, `UseSoon` at
/// `use_soon_days` or fewer. Shipped defaults are 3 and 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessThresholds {
    #[serde(default = "default_critical_days")]
    pub critical_days: u32,
    #[serde(default = "default_use_soon_days")]
    pub use_soon_days: u32,
}

impl Default for FreshnessThresholds {
    fn default() -> Self {
        Self {
            critical_days: default_critical_days(),
            use_soon_days: default_use_soon_days(),
        }
    }
}

impl FreshnessThresholds {
    /// Returns the config file path within the given data directory.
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Loads thresholds from a TOML file. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let thresholds = toml::from_str(&content)?;
        Ok(thresholds)
    }

    /// Saves thresholds to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validates threshold values and returns a list of validation errors.
    /// Returns an empty vec if the thresholds are valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.critical_days == 0 {
            errors.push("critical_days must be at least 1".to_string());
        }

        if self.use_soon_days < self.critical_days {
            errors.push("use_soon_days must not be below critical_days".to_string());
        }

        errors
    }

    /// Returns validated thresholds, falling back to defaults when invalid.
    pub fn with_defaults_for_invalid(&self) -> Self {
        if self.validate().is_empty() {
            *self
        } else {
            Self::default()
        }
    }
}

fn default_critical_days() -> u32 {
    3
}

fn default_use_soon_days() -> u32 {
    7
}

/// Errors that can occur when loading or saving config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
