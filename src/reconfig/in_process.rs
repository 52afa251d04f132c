//! In-process reconfiguration channel backed by a handler registry.

use crate::error::Result;
use crate::reconfig::{ReconfigChannel, ReconfigFields, ReconfigHandler, Subscription};
use parking_lot::RwLock;
use std::sync::Arc;

/// Internal registry state.
struct Registry {
    handlers: Vec<(usize, ReconfigHandler)>,
    next_id: usize,
}

/// A channel whose updates are published by code in the same process.
///
/// Useful for operator consoles, tests, or any component that already owns
/// the new parameter values. [`publish`](Self::publish) runs every handler on
/// the calling thread. Clones share the same registry.
///
/// # Examples
///
/// ```rust
/// use costmap_weights::core::{ConfigCell, WeightSet};
/// use costmap_weights::reconfig::{InProcessChannel, ReconfigBridge, ReconfigFields};
///
/// let cell = ConfigCell::new(WeightSet::default());
/// let channel = InProcessChannel::new();
/// let _bridge = ReconfigBridge::attach(cell.clone(), &channel).unwrap();
///
/// channel.publish(
///     &ReconfigFields::new()
///         .with("obstacle_weight", 2.0)
///         .with("inflation_weight", 1.0),
/// );
/// assert_eq!(*cell.read(), WeightSet::new(2.0, 1.0));
/// ```
#[derive(Clone)]
pub struct InProcessChannel {
    inner: Arc<RwLock<Registry>>,
}

impl InProcessChannel {
    /// Create a channel with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Registry {
                handlers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Deliver `fields` to every subscriber, in subscription order.
    ///
    /// Handlers run outside the registry lock, so a handler may subscribe or
    /// drop subscriptions without deadlocking.
    pub fn publish(&self, fields: &ReconfigFields) {
        let handlers: Vec<ReconfigHandler> = self
            .inner
            .read()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler(fields);
        }
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.read().handlers.len()
    }
}

impl Default for InProcessChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconfigChannel for InProcessChannel {
    fn subscribe(&self, handler: ReconfigHandler) -> Result<Subscription> {
        let id = {
            let mut inner = self.inner.write();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.handlers.push((id, handler));
            id
        };

        let registry = Arc::downgrade(&self.inner);
        Ok(Subscription::new(self.name(), move || {
            if let Some(registry) = registry.upgrade() {
                registry.write().handlers.retain(|(sub_id, _)| *sub_id != id);
            }
        }))
    }

    fn name(&self) -> String {
        "in-process".to_string()
    }
}
