//! Rigging - composable compiler/linker configuration for C builds
//!
//! This crate provides the configuration-composition core of a build
//! description: contributors that attach flags and paths to build
//! commands, the scoped context they read settings from, and
//! variant-aware project naming.

pub mod builder;
pub mod core;
pub mod util;

/// Test utilities and mocks for rigging unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted process runner for config-tool
/// contributors.
#[cfg(test)]
pub mod test_support;

pub use builder::{
    compose, BuildInputs, CommandType, Contributor, Executor, ExplicitLibrary, PkgConfig,
    ResultsLibrary, SdlConfig,
};
pub use core::{Context, PhaseHandle, Project};
pub use util::errors::{ConfigError, Error, ExternalToolError, Result};
