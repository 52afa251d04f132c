//! Environment variable weight source.

use super::ConfigSource;
use crate::error::{ConfigError, Result};
use crate::reconfig::ReconfigFields;
use config::Environment;
use std::collections::HashMap;

/// Reads weights from prefixed environment variables.
///
/// # Examples
///
/// ```rust
/// use costmap_weights::sources::EnvSource;
///
/// // COSTMAP_OBSTACLE_WEIGHT=2.0 -> obstacle_weight = 2.0
/// let source = EnvSource::new("COSTMAP", "__");
/// ```
pub struct EnvSource {
    prefix: String,
    separator: String,
    priority: i32,
}

impl EnvSource {
    /// Create a new environment variable source.
    ///
    /// # Arguments
    ///
    /// * `prefix` - Prefix for environment variables (e.g., "COSTMAP")
    /// * `separator` - Separator for nested keys (e.g., "__")
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
            priority: 300,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<ReconfigFields> {
        let env_source = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .separator(&self.separator)
            .try_parsing(true);

        let parsed = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                ConfigError::LoadError(format!("Failed to load environment variables: {}", e))
            })?;

        let values = parsed
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                ConfigError::DeserializationError(format!(
                    "Failed to parse environment variables: {}",
                    e
                ))
            })?;

        Ok(ReconfigFields::from(values))
    }

    fn name(&self) -> String {
        format!("env:{}*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
