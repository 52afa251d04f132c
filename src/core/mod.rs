//! Core weight storage and the component that owns it.

mod builder;
mod config_cell;
mod costmap;
mod loader;
mod weights;

pub use builder::CostmapBuilder;
pub use config_cell::ConfigCell;
pub use costmap::Costmap;
pub use loader::WeightLoader;
pub use weights::WeightSet;
