//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod errors;
pub mod process;
pub mod split;
pub mod types;

pub use diagnostic::Diagnostic;
pub use errors::{ConfigError, Error, ExternalToolError, Result};
