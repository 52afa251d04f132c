//! File-based weight source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use crate::reconfig::ReconfigFields;
use config::File;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Reads weights from a YAML, TOML, or JSON file.
///
/// The format is picked from the file extension. Weights live at the top
/// level of the document:
///
/// ```yaml
/// obstacle_weight: 2.0
/// inflation_weight: 0.5
/// ```
///
/// # Examples
///
/// ```rust,no_run
/// use costmap_weights::sources::FileSource;
///
/// let source = FileSource::new("config/weights.yaml");
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

impl FileSource {
    /// Create a new file source with automatic format detection.
    ///
    /// - `.yaml`, `.yml` -> YAML
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn validate_extension(&self) -> Result<()> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ConfigError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" | "toml" | "json" => Ok(()),
            _ => Err(ConfigError::LoadError(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<ReconfigFields> {
        self.validate_extension()?;

        if !self.path.exists() {
            return Err(ConfigError::LoadError(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }

        let parsed = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| ConfigError::LoadError(format!("Failed to load file: {}", e)))?;

        let values = parsed
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                ConfigError::DeserializationError(format!("Failed to parse file: {}", e))
            })?;

        Ok(ReconfigFields::from(values))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
