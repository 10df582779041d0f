//! `wakeup-core` — configuration and wire types shared between the wakeup
//! scheduling engine and host-side adapters.

pub mod config;
pub mod error;
pub mod events;

pub use config::{DatabaseConfig, WakeupConfig};
pub use error::{CoreError, Result};
pub use events::WakeupEvent;
