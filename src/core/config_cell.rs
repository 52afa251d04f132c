//! The snapshot cell providing lock-free reads and atomic replacement.

use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// A thread-safe holder for an immutable snapshot of `T`.
///
/// Readers get the snapshot that was current when they called [`read`](Self::read)
/// and keep it for as long as they like; a later [`write`](Self::write) publishes a
/// new snapshot without touching the ones already handed out. The swap itself is a
/// single atomic pointer store, so readers never see a value assembled from two
/// different writes, and writers never wait on readers.
///
/// Cloning a `ConfigCell` produces another handle to the same snapshot, which is
/// how the owning component shares it with the reconfiguration path.
///
/// # Examples
///
/// ```rust
/// use costmap_weights::core::{ConfigCell, WeightSet};
///
/// let cell = ConfigCell::new(WeightSet::default());
/// cell.write(WeightSet::new(2.0, 1.0));
///
/// let weights = cell.read();
/// assert_eq!(weights.obstacle_weight, 2.0);
/// ```
pub struct ConfigCell<T> {
    /// The current snapshot, shared between all handles
    current: Arc<ArcSwap<T>>,
}

impl<T> ConfigCell<T> {
    /// Create a cell holding `initial` as its first snapshot.
    pub fn new(initial: T) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Get a reference-counted view of the current snapshot.
    ///
    /// Lock-free. Never blocks writers or other readers, and the returned
    /// value is unaffected by later writes.
    pub fn read(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Get an owned copy of the current snapshot.
    pub fn read_copy(&self) -> T
    where
        T: Clone,
    {
        T::clone(&self.current.load())
    }

    /// Publish `value` as the new snapshot.
    ///
    /// The value is moved onto the heap before the publish point, so the swap
    /// itself does no allocation. Concurrent writers are serialized by the
    /// atomic store and the last one to publish wins.
    pub fn write(&self, value: T) {
        self.current.store(Arc::new(value));
    }

    /// Publish `value` and return the snapshot it replaced.
    pub fn swap(&self, value: T) -> Arc<T> {
        self.current.swap(Arc::new(value))
    }
}

impl<T> Clone for ConfigCell<T> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<T: Default> Default for ConfigCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigCell")
            .field("current", &*self.current.load())
            .finish()
    }
}
