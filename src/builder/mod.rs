//! Build command composition.
//!
//! Contributors append include paths, defines, library paths and
//! libraries to an executor. This module holds the executor contract,
//! the dispatch protocol, and the built-in contributors.

pub mod contributor;
pub mod executor;
pub mod flags;
pub mod library;
pub mod tools;

pub use contributor::{compose, Contribute, Contributor, HookTable};
pub use executor::{BuildInputs, CommandType, Define, Executor};
pub use library::{ExplicitLibrary, ResultsLibrary};
pub use tools::{configure_sdl_config, ConfigTool, PkgConfig, SdlConfig, ToolOverrides};
