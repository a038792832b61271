//! Logging setup and project-tree traversal

pub mod logging;
pub mod walk;

pub use logging::{init_logging, LoggingConfig, RunLog};
