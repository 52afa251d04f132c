//! Runtime reconfiguration: channels, the records they deliver, and the
//! bridge that applies them to a weight cell.

mod bridge;
mod channel;
mod fields;
mod in_process;

#[cfg(feature = "file-watch")]
mod file_channel;

pub use bridge::{ReconfigBridge, Validator};
pub use channel::{ReconfigChannel, ReconfigHandler, Subscription};
pub use fields::ReconfigFields;
pub use in_process::InProcessChannel;

#[cfg(feature = "file-watch")]
pub use file_channel::FileChannel;
