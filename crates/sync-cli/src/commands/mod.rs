//! Command implementations for sync-cli

pub mod apply;
pub mod check;
pub mod inspect;
pub mod prepare;

pub use apply::run_apply;
pub use check::run_check;
pub use inspect::run_inspect;
pub use prepare::run_prepare;
