//! Filesystem support for settings-sync
//!
//! Provides atomic writes, the sync lock file and format-agnostic config loading.

pub mod config;
pub mod error;
pub mod io;
pub mod lock;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use lock::SyncLock;
