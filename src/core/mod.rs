//! Core data structures for rigging.
//!
//! This module contains the foundational types the contributors read from:
//! - The scoped configuration context and its values
//! - Phase handles and the results they publish
//! - Projects and their platform-derived naming

pub mod context;
pub mod phase;
pub mod platform;
pub mod project;
pub mod resolved;
pub mod value;

pub use context::{Context, ContextScope, Layer, NamespaceRef};
pub use phase::{PhaseHandle, PhaseResults};
pub use project::Project;
pub use resolved::Resolved;
pub use value::{ContextValue, Namespace};
