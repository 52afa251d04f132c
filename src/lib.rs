//! # costmap-weights
//!
//! Hot-reloadable cost weights for planners, with lock-free snapshot reads and
//! atomic updates.
//!
//! ## Overview
//!
//! A planner's costing routine reads its weights on every call, while an
//! operator may push new weights at any moment from another thread. This crate
//! keeps the two apart:
//! - [`ConfigCell`](core::ConfigCell) holds an immutable snapshot and swaps it
//!   atomically using `arc-swap`; readers never see half of an update
//! - [`ReconfigBridge`](reconfig::ReconfigBridge) turns records pushed by a
//!   [`ReconfigChannel`](reconfig::ReconfigChannel) into fresh snapshots
//! - [`Costmap`](core::Costmap) owns the cell and, optionally, the bridge
//!
//! ## Quick Start
//!
//! ```rust
//! use costmap_weights::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let channel = InProcessChannel::new();
//! let costmap = Costmap::builder()
//!     .with_defaults(WeightSet::new(1.0, 1.0))
//!     .with_channel(channel.clone())
//!     .build()?;
//!
//! // An operator pushes new weights from anywhere
//! channel.publish(
//!     &ReconfigFields::new()
//!         .with("obstacle_weight", 2.0)
//!         .with("inflation_weight", 1.0),
//! );
//!
//! // The next costing call sees them
//! assert_eq!(costmap.cost(10.0, 4.0), 24.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `file-watch` (default): [`FileChannel`](reconfig::FileChannel), which
//!   reloads weights when a YAML/TOML/JSON file changes. Requires a tokio
//!   runtime.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod reconfig;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ConfigCell, Costmap, CostmapBuilder, WeightSet};
    pub use crate::error::{ConfigError, Result, ValidationError};
    pub use crate::reconfig::{InProcessChannel, ReconfigBridge, ReconfigChannel, ReconfigFields};

    #[cfg(feature = "file-watch")]
    pub use crate::reconfig::FileChannel;
}
