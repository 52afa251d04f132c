//! Configuration source trait.

use crate::error::Result;
use crate::reconfig::ReconfigFields;

/// A place initial weights can be read from.
///
/// Implement this trait to feed weights from somewhere other than files or
/// environment variables (e.g. a parameter server snapshot taken at startup).
pub trait ConfigSource: Send + Sync {
    /// Load the parameters this source provides.
    ///
    /// A source may provide only some of the weights; the loader merges all
    /// sources on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or parsed.
    fn load(&self) -> Result<ReconfigFields>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Environment variables: 300
    /// - Files: 100, 110, 120, ... in the order they were added
    fn priority(&self) -> i32 {
        100
    }
}
