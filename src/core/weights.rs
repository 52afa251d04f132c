//! The weight snapshot consumed by costing routines.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative influence of each cost layer in the planner's cost function.
///
/// A `WeightSet` is a plain value: reconfiguration builds a fresh one and
/// publishes it whole, it is never patched in place. Weights are ordered,
/// so they can also be addressed positionally (see [`WeightSet::FIELD_NAMES`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    /// Weight applied to lethal/obstacle cost (position 0).
    pub obstacle_weight: f64,
    /// Weight applied to inflation cost around obstacles (position 1).
    pub inflation_weight: f64,
}

impl WeightSet {
    /// Weight names in positional order.
    pub const FIELD_NAMES: [&'static str; 2] = ["obstacle_weight", "inflation_weight"];

    /// Number of weights in a set.
    pub const LEN: usize = Self::FIELD_NAMES.len();

    /// Create a weight set from its named components.
    pub const fn new(obstacle_weight: f64, inflation_weight: f64) -> Self {
        Self {
            obstacle_weight,
            inflation_weight,
        }
    }

    /// Build a weight set from positional values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FieldCount`] unless exactly [`WeightSet::LEN`]
    /// values are supplied. Values themselves are taken as-is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use costmap_weights::core::WeightSet;
    ///
    /// let weights = WeightSet::from_slice(&[2.0, 0.5]).unwrap();
    /// assert_eq!(weights, WeightSet::new(2.0, 0.5));
    ///
    /// assert!(WeightSet::from_slice(&[1.0]).is_err());
    /// ```
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match *values {
            [obstacle_weight, inflation_weight] => Ok(Self::new(obstacle_weight, inflation_weight)),
            _ => Err(ConfigError::FieldCount {
                expected: Self::LEN,
                found: values.len(),
            }),
        }
    }

    /// Weights in positional order.
    pub fn as_array(&self) -> [f64; 2] {
        [self.obstacle_weight, self.inflation_weight]
    }

    /// Look up a weight by name.
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "obstacle_weight" => Some(self.obstacle_weight),
            "inflation_weight" => Some(self.inflation_weight),
            _ => None,
        }
    }

    /// Combine per-layer costs into a single weighted cost.
    pub fn weighted_cost(&self, obstacle_cost: f64, inflation_cost: f64) -> f64 {
        self.obstacle_weight * obstacle_cost + self.inflation_weight * inflation_cost
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl fmt::Display for WeightSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "obstacle_weight={}, inflation_weight={}",
            self.obstacle_weight, self.inflation_weight
        )
    }
}
