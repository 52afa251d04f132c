//! The costmap component owning the live weights.

use crate::core::{ConfigCell, CostmapBuilder, WeightSet};
use crate::error::{ConfigError, Result};
use crate::reconfig::{ReconfigBridge, ReconfigChannel, Validator};
use std::sync::Arc;

/// Owner of the cost weights used by the planner.
///
/// The costmap holds the one [`ConfigCell`] for its weights and, optionally,
/// a [`ReconfigBridge`] that keeps them in sync with a reconfiguration
/// channel. Costing calls read a fresh snapshot per invocation, so an update
/// takes effect on the next call without interrupting the current one.
///
/// Reconfiguration is a runtime capability: a costmap without a bridge
/// behaves exactly like one with a bridge that never receives updates.
///
/// # Examples
///
/// ```rust
/// use costmap_weights::core::{Costmap, WeightSet};
///
/// let costmap = Costmap::new(WeightSet::default());
/// costmap.update_weights(&[2.0, 1.0]).unwrap();
///
/// assert_eq!(*costmap.weights(), WeightSet::new(2.0, 1.0));
/// assert_eq!(costmap.cost(10.0, 5.0), 25.0);
/// ```
pub struct Costmap {
    weights: ConfigCell<WeightSet>,
    reconfig: Option<ReconfigBridge>,
    validator: Option<Validator>,
}

impl Costmap {
    /// Create a costmap with fixed starting weights and no reconfiguration.
    pub fn new(defaults: WeightSet) -> Self {
        Self {
            weights: ConfigCell::new(defaults),
            reconfig: None,
            validator: None,
        }
    }

    /// Create a new builder for constructing a costmap.
    pub fn builder() -> CostmapBuilder {
        CostmapBuilder::new()
    }

    pub(crate) fn with_bridge(
        weights: ConfigCell<WeightSet>,
        reconfig: Option<ReconfigBridge>,
        validator: Option<Validator>,
    ) -> Self {
        Self {
            weights,
            reconfig,
            validator,
        }
    }

    /// Snapshot of the current weights.
    pub fn weights(&self) -> Arc<WeightSet> {
        self.weights.read()
    }

    /// Replace the weights from positional values.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::FieldCount`] unless exactly two values are supplied
    /// - [`ConfigError::ValidationError`] if the builder's validator rejects
    ///   the new weights
    ///
    /// The weights are unchanged on error.
    pub fn update_weights(&self, values: &[f64]) -> Result<()> {
        let weights = WeightSet::from_slice(values)?;
        if let Some(validator) = &self.validator {
            validator(&weights).map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        }
        self.weights.write(weights);
        tracing::debug!(weights = %weights, "Updated cost weights");
        Ok(())
    }

    /// Weighted cost of a cell, using the weights current at call time.
    pub fn cost(&self, obstacle_cost: f64, inflation_cost: f64) -> f64 {
        self.weights.read().weighted_cost(obstacle_cost, inflation_cost)
    }

    /// Handle to the weight cell, for components that read it directly.
    pub fn cell(&self) -> &ConfigCell<WeightSet> {
        &self.weights
    }

    /// Whether a reconfiguration channel is wired up.
    pub fn is_reconfigurable(&self) -> bool {
        self.reconfig
            .as_ref()
            .is_some_and(ReconfigBridge::is_subscribed)
    }

    /// Start following `channel`, replacing any current subscription.
    ///
    /// Channel updates go through the builder's validator, if one was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel refuses the subscription.
    pub fn enable_reconfigure<C>(&mut self, channel: &C) -> Result<()>
    where
        C: ReconfigChannel + ?Sized,
    {
        if let Some(bridge) = self.reconfig.as_mut() {
            return bridge.connect(channel);
        }

        let mut bridge = ReconfigBridge::new(self.weights.clone());
        if let Some(validator) = &self.validator {
            bridge.set_validator(Arc::clone(validator));
        }
        bridge.connect(channel)?;
        self.reconfig = Some(bridge);
        Ok(())
    }

    /// Stop following the reconfiguration channel. The current weights stay.
    pub fn disable_reconfigure(&mut self) {
        if let Some(bridge) = self.reconfig.as_mut() {
            bridge.detach();
        }
    }
}

impl Default for Costmap {
    fn default() -> Self {
        Self::new(WeightSet::default())
    }
}
