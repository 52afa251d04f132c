//! Adapter forwarding channel updates into a weight cell.

use crate::core::{ConfigCell, WeightSet};
use crate::error::{Result, ValidationError};
use crate::reconfig::{ReconfigChannel, ReconfigFields, ReconfigHandler, Subscription};
use parking_lot::RwLock;
use std::sync::Arc;

/// Type alias for weight validator functions.
pub type Validator =
    Arc<dyn Fn(&WeightSet) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// Validator slot shared between the bridge and its live channel handler.
type SharedValidator = Arc<RwLock<Option<Validator>>>;

/// Forwards reconfiguration updates into a [`ConfigCell<WeightSet>`].
///
/// Each update is unpacked into a brand-new [`WeightSet`] and published with a
/// single write, so both weights from one update become visible together.
/// An update that is missing a weight, carries a non-numeric value, or fails
/// the optional validator is rejected and the current weights stay in place.
///
/// The bridge is either subscribed to one channel or unsubscribed. Dropping
/// it unsubscribes.
///
/// # Examples
///
/// ```rust
/// use costmap_weights::core::{ConfigCell, WeightSet};
/// use costmap_weights::reconfig::{ReconfigBridge, ReconfigFields};
///
/// let cell = ConfigCell::new(WeightSet::default());
/// let bridge = ReconfigBridge::new(cell.clone());
///
/// bridge
///     .on_reconfigure(
///         &ReconfigFields::new()
///             .with("obstacle_weight", 5.0)
///             .with("inflation_weight", 2.0),
///     )
///     .unwrap();
/// assert_eq!(*cell.read(), WeightSet::new(5.0, 2.0));
/// ```
pub struct ReconfigBridge {
    cell: ConfigCell<WeightSet>,
    validator: SharedValidator,
    subscription: Option<Subscription>,
}

impl ReconfigBridge {
    /// Create an unsubscribed bridge writing into `cell`.
    pub fn new(cell: ConfigCell<WeightSet>) -> Self {
        Self {
            cell,
            validator: Arc::new(RwLock::new(None)),
            subscription: None,
        }
    }

    /// Create a bridge and subscribe it to `channel` in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel refuses the subscription.
    pub fn attach<C>(cell: ConfigCell<WeightSet>, channel: &C) -> Result<Self>
    where
        C: ReconfigChannel + ?Sized,
    {
        let mut bridge = Self::new(cell);
        bridge.connect(channel)?;
        Ok(bridge)
    }

    /// Reject updates for which `validator` returns an error.
    ///
    /// Applies to direct [`on_reconfigure`](Self::on_reconfigure) calls and to
    /// channel updates, including those of a subscription made before this call.
    pub fn with_validation<F>(mut self, validator: F) -> Self
    where
        F: Fn(&WeightSet) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.set_validator(Arc::new(validator));
        self
    }

    pub(crate) fn set_validator(&mut self, validator: Validator) {
        *self.validator.write() = Some(validator);
    }

    /// Subscribe to `channel`, replacing any current subscription.
    ///
    /// Updates are applied on whatever thread the channel delivers them on.
    /// Rejected updates are logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel refuses the subscription. The previous
    /// subscription, if any, is kept in that case.
    pub fn connect<C>(&mut self, channel: &C) -> Result<()>
    where
        C: ReconfigChannel + ?Sized,
    {
        let name = channel.name();
        let cell = self.cell.clone();
        let validator = Arc::clone(&self.validator);
        let channel_name = name.clone();

        let handler: ReconfigHandler = Arc::new(move |fields: &ReconfigFields| {
            if let Err(e) = apply_update(&cell, &validator, fields) {
                tracing::warn!(
                    channel = %channel_name,
                    error = %e,
                    "Rejected reconfiguration, keeping current weights"
                );
            }
        });

        let subscription = channel.subscribe(handler)?;
        self.detach();
        self.subscription = Some(subscription);
        tracing::info!(channel = %name, "Reconfiguration bridge attached");
        Ok(())
    }

    /// Drop the current subscription, if any.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            tracing::info!(
                channel = %subscription.channel(),
                "Reconfiguration bridge detached"
            );
        }
    }

    /// Whether the bridge is currently subscribed to a channel.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Name of the channel the bridge is subscribed to.
    pub fn channel_name(&self) -> Option<&str> {
        self.subscription.as_ref().map(Subscription::channel)
    }

    /// Apply one reconfiguration record to the cell.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`](crate::error::ConfigError::MissingField)
    ///   if a weight is absent
    /// - [`ConfigError::InvalidField`](crate::error::ConfigError::InvalidField)
    ///   if a weight is not a number
    /// - [`ConfigError::ValidationError`](crate::error::ConfigError::ValidationError)
    ///   if the validator rejects the new weights
    ///
    /// The cell is untouched on error.
    pub fn on_reconfigure(&self, fields: &ReconfigFields) -> Result<()> {
        apply_update(&self.cell, &self.validator, fields)
    }
}

fn apply_update(
    cell: &ConfigCell<WeightSet>,
    validator: &SharedValidator,
    fields: &ReconfigFields,
) -> Result<()> {
    let weights = WeightSet::try_from(fields)?;

    // Clone out so the validator runs without holding the slot lock
    let validator = validator.read().clone();
    if let Some(validator) = validator {
        validator(&weights)?;
    }

    let unknown = fields.unknown_fields();
    if !unknown.is_empty() {
        tracing::debug!(?unknown, "Ignoring non-weight fields in reconfiguration");
    }

    let previous = cell.swap(weights);
    tracing::info!(old = %previous, new = %weights, "Applied cost weight update");
    Ok(())
}
