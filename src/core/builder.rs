//! Builder for constructing Costmap instances.

use crate::core::{ConfigCell, Costmap, WeightLoader, WeightSet};
use crate::error::{ConfigError, Result, ValidationError};
use crate::reconfig::{ReconfigBridge, ReconfigChannel, Validator};
use crate::sources::{ConfigSource, EnvSource, FileSource};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for constructing a [`Costmap`].
///
/// Starting weights are the defaults overlaid with files (in the order added)
/// and then environment variables. A reconfiguration channel, if given, is
/// subscribed once the starting weights are in place.
///
/// # Examples
///
/// ```rust,no_run
/// use costmap_weights::prelude::*;
///
/// # fn example() -> Result<()> {
/// let channel = InProcessChannel::new();
/// let costmap = Costmap::builder()
///     .with_defaults(WeightSet::new(1.0, 0.5))
///     .with_file("config/weights.yaml")
///     .with_env_overrides("COSTMAP", "__")
///     .with_channel(channel.clone())
///     .build()?;
///
/// assert!(costmap.is_reconfigurable());
/// # Ok(())
/// # }
/// ```
pub struct CostmapBuilder {
    defaults: WeightSet,
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    custom_sources: Vec<Box<dyn ConfigSource>>,
    channel: Option<Box<dyn ReconfigChannel>>,
    validator: Option<Validator>,
}

impl CostmapBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            defaults: WeightSet::default(),
            file_paths: Vec::new(),
            env_prefix: None,
            env_separator: None,
            custom_sources: Vec::new(),
            channel: None,
            validator: None,
        }
    }

    /// Weights used for anything no source provides.
    pub fn with_defaults(mut self, defaults: WeightSet) -> Self {
        self.defaults = defaults;
        self
    }

    /// Add a weight file (YAML, TOML or JSON).
    ///
    /// Later files override earlier ones.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Read weights from environment variables with the given prefix.
    ///
    /// Environment variables override every file.
    ///
    /// ```rust,no_run
    /// use costmap_weights::prelude::*;
    ///
    /// // COSTMAP_INFLATION_WEIGHT=0.3 -> inflation_weight = 0.3
    /// Costmap::builder().with_env_overrides("COSTMAP", "__");
    /// ```
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Add a custom weight source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Follow `channel` for runtime weight updates.
    pub fn with_channel<C: ReconfigChannel + 'static>(mut self, channel: C) -> Self {
        self.channel = Some(Box::new(channel));
        self
    }

    /// Reject starting weights and runtime updates for which `validator`
    /// returns an error.
    ///
    /// ```rust
    /// use costmap_weights::prelude::*;
    ///
    /// let result = Costmap::builder()
    ///     .with_defaults(WeightSet::new(-1.0, 1.0))
    ///     .with_validation(|weights: &WeightSet| {
    ///         if weights.obstacle_weight < 0.0 {
    ///             return Err(ValidationError::invalid_field(
    ///                 "obstacle_weight",
    ///                 "must not be negative",
    ///             ));
    ///         }
    ///         Ok(())
    ///     })
    ///     .build();
    /// assert!(result.is_err());
    /// ```
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&WeightSet) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Build the costmap.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A source cannot be loaded or holds a non-numeric weight
    /// - Validation of the starting weights fails
    /// - The channel refuses the subscription
    pub fn build(self) -> Result<Costmap> {
        let mut loader = WeightLoader::new();

        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 + (index as i32 * 10);
            loader.add_source(Box::new(FileSource::new(path).with_priority(priority)));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        if let (Some(prefix), Some(separator)) = (self.env_prefix, self.env_separator) {
            loader.add_source(Box::new(EnvSource::new(prefix, separator)));
        }

        let weights = loader.load(&self.defaults)?;

        if let Some(validator) = &self.validator {
            validator(&weights).map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }

        tracing::info!(
            weights = %weights,
            sources = ?loader.source_names(),
            "Loaded starting cost weights"
        );

        let cell = ConfigCell::new(weights);
        let bridge = match self.channel {
            Some(channel) => {
                let mut bridge = ReconfigBridge::new(cell.clone());
                if let Some(validator) = &self.validator {
                    bridge.set_validator(Arc::clone(validator));
                }
                bridge.connect(channel.as_ref())?;
                Some(bridge)
            }
            None => None,
        };

        Ok(Costmap::with_bridge(cell, bridge, self.validator))
    }
}

impl Default for CostmapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconfig::{InProcessChannel, ReconfigFields};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_accumulates_files() {
        let builder = CostmapBuilder::new()
            .with_file("weights1.yaml")
            .with_file("weights2.yaml")
            .with_file("weights3.yaml");

        assert_eq!(builder.file_paths.len(), 3);
    }

    #[test]
    fn test_builder_env_overrides() {
        let builder = CostmapBuilder::new().with_env_overrides("COSTMAP", "__");

        assert_eq!(builder.env_prefix, Some("COSTMAP".to_string()));
        assert_eq!(builder.env_separator, Some("__".to_string()));
    }

    #[test]
    fn test_build_without_sources_uses_defaults() {
        let costmap = CostmapBuilder::new()
            .with_defaults(WeightSet::new(2.0, 3.0))
            .build()
            .unwrap();

        assert_eq!(*costmap.weights(), WeightSet::new(2.0, 3.0));
        assert!(!costmap.is_reconfigurable());
    }

    #[test]
    fn test_later_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("base.yaml");
        let site = temp_dir.path().join("site.toml");
        fs::write(&base, "obstacle_weight: 2.0\ninflation_weight: 2.0\n").unwrap();
        fs::write(&site, "inflation_weight = 0.5\n").unwrap();

        let costmap = CostmapBuilder::new()
            .with_file(&base)
            .with_file(&site)
            .build()
            .unwrap();

        assert_eq!(*costmap.weights(), WeightSet::new(2.0, 0.5));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = CostmapBuilder::new()
            .with_file("/nonexistent/weights.yaml")
            .build();
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_validation_applies_to_channel_updates() {
        let channel = InProcessChannel::new();
        let costmap = CostmapBuilder::new()
            .with_channel(channel.clone())
            .with_validation(|weights: &WeightSet| {
                if weights.inflation_weight > 10.0 {
                    return Err(ValidationError::invalid_field(
                        "inflation_weight",
                        "must be at most 10",
                    ));
                }
                Ok(())
            })
            .build()
            .unwrap();
        assert!(costmap.is_reconfigurable());

        channel.publish(
            &ReconfigFields::new()
                .with("obstacle_weight", 1.0)
                .with("inflation_weight", 50.0),
        );
        assert_eq!(*costmap.weights(), WeightSet::default());

        channel.publish(
            &ReconfigFields::new()
                .with("obstacle_weight", 1.0)
                .with("inflation_weight", 5.0),
        );
        assert_eq!(*costmap.weights(), WeightSet::new(1.0, 5.0));
    }

    #[test]
    fn test_validation_applies_to_direct_updates() {
        let costmap = CostmapBuilder::new()
            .with_validation(|weights: &WeightSet| {
                if weights.obstacle_weight < 0.0 {
                    return Err(ValidationError::invalid_field(
                        "obstacle_weight",
                        "must not be negative",
                    ));
                }
                Ok(())
            })
            .build()
            .unwrap();

        let err = costmap.update_weights(&[-5.0, 1.0]).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert_eq!(*costmap.weights(), WeightSet::default());

        costmap.update_weights(&[5.0, 1.0]).unwrap();
        assert_eq!(*costmap.weights(), WeightSet::new(5.0, 1.0));
    }

    #[test]
    fn test_validation_applies_after_enable_reconfigure() {
        let mut costmap = CostmapBuilder::new()
            .with_validation(|weights: &WeightSet| {
                if weights.obstacle_weight < 0.0 {
                    return Err(ValidationError::invalid_field(
                        "obstacle_weight",
                        "must not be negative",
                    ));
                }
                Ok(())
            })
            .build()
            .unwrap();
        assert!(!costmap.is_reconfigurable());

        let channel = InProcessChannel::new();
        costmap.enable_reconfigure(&channel).unwrap();

        channel.publish(
            &ReconfigFields::new()
                .with("obstacle_weight", -7.0)
                .with("inflation_weight", 1.0),
        );
        assert_eq!(*costmap.weights(), WeightSet::new(1.0, 1.0));

        channel.publish(
            &ReconfigFields::new()
                .with("obstacle_weight", 7.0)
                .with("inflation_weight", 1.0),
        );
        assert_eq!(*costmap.weights(), WeightSet::new(7.0, 1.0));
    }
}
