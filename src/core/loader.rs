//! Loader that layers sources over the default weights.

use crate::core::WeightSet;
use crate::error::Result;
use crate::reconfig::ReconfigFields;
use crate::sources::ConfigSource;

/// Loads the initial weights from multiple sources.
///
/// Sources are merged in priority order (lowest to highest) on top of the
/// defaults, so each weight comes from the highest-priority source that
/// provides it and falls back to the default otherwise.
pub struct WeightLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl WeightLoader {
    /// Create a loader with no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a weight source.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Merge `defaults` and every source into a single weight set.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any source fails to load
    /// - A provided weight is not a number
    pub fn load(&self, defaults: &WeightSet) -> Result<WeightSet> {
        let mut merged = ReconfigFields::from(defaults);

        for source in self.sorted_sources() {
            let fields = source.load()?;
            tracing::debug!(
                source = %source.name(),
                priority = source.priority(),
                fields = fields.len(),
                "Merged weight source"
            );
            merged.merge(fields);
        }

        WeightSet::try_from(&merged)
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        self.sorted_sources().iter().map(|s| s.name()).collect()
    }

    fn sorted_sources(&self) -> Vec<&dyn ConfigSource> {
        let mut sorted: Vec<&dyn ConfigSource> = self.sources.iter().map(|s| s.as_ref()).collect();
        sorted.sort_by_key(|s| s.priority());
        sorted
    }
}

impl Default for WeightLoader {
    fn default() -> Self {
        Self::new()
    }
}
