//! Reconfiguration channel trait and subscription handles.

use crate::error::Result;
use crate::reconfig::ReconfigFields;
use std::fmt;
use std::sync::Arc;

/// Callback a channel invokes with every record it delivers.
///
/// Channels call it from their own threads, never the consumer's.
pub type ReconfigHandler = Arc<dyn Fn(&ReconfigFields) + Send + Sync>;

/// A transport that pushes parameter updates at runtime.
///
/// Implement this trait to plug a parameter server, message bus or any other
/// operator-facing mechanism into a [`ReconfigBridge`](crate::reconfig::ReconfigBridge).
pub trait ReconfigChannel: Send + Sync {
    /// Register `handler` to receive every future update.
    ///
    /// The returned [`Subscription`] keeps the registration alive; dropping it
    /// unsubscribes.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport cannot start delivering updates.
    fn subscribe(&self, handler: ReconfigHandler) -> Result<Subscription>;

    /// Get a human-readable name for this channel (for logging/debugging).
    fn name(&self) -> String;
}

/// Handle for a channel registration.
///
/// When the handle is dropped, the registration is removed.
pub struct Subscription {
    channel: String,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Create a handle that runs `cancel` once when dropped.
    pub fn new<F>(channel: impl Into<String>, cancel: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            channel: channel.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Name of the channel this subscription belongs to.
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
