//! Toolgate Core
//!
//! Shared foundation for the toolgate SDK: the base error type and
//! structured-logging setup used by the other crates.

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{GateError, Result};
pub use logging::init_logging;
