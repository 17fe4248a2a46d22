//! Library contributors.
//!
//! `ExplicitLibrary` carries its data inline. `ResultsLibrary` points at a
//! build phase and picks up whatever that phase published into the context.

use std::path::PathBuf;
use std::sync::LazyLock;

use crate::builder::contributor::{impl_contributor_typed, Contribute, HookTable};
use crate::builder::executor::{CommandType, Define};
use crate::core::context::Context;
use crate::core::phase::PhaseHandle;
use crate::util::errors::Result;
use crate::util::types::{verify_instance, Typed};

/// A library with explicitly stated include paths, defines, library
/// paths and library names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitLibrary {
    include_paths: Vec<PathBuf>,
    defines: Vec<Define>,
    library_paths: Vec<PathBuf>,
    libraries: Vec<String>,
}

impl ExplicitLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_paths(
        mut self,
        paths: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        self.include_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_defines(mut self, defines: impl IntoIterator<Item = Define>) -> Self {
        self.defines.extend(defines);
        self
    }

    pub fn with_library_paths(
        mut self,
        paths: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        self.library_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_libraries(
        mut self,
        libraries: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.libraries.extend(libraries.into_iter().map(Into::into));
        self
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    pub fn library_paths(&self) -> &[PathBuf] {
        &self.library_paths
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }
}

static EXPLICIT_LIBRARY_HOOKS: LazyLock<HookTable<ExplicitLibrary>> = LazyLock::new(|| {
    HookTable::<ExplicitLibrary>::new()
        .with(CommandType::COMPILE, |library, executor| {
            for path in &library.include_paths {
                executor.add_include_path(path);
            }
            for define in &library.defines {
                executor.define_symbol(&define.name, define.value.as_deref());
            }
            Ok(())
        })
        .with(CommandType::LINK, |library, executor| {
            for path in &library.library_paths {
                executor.add_library_path(path);
            }
            for name in &library.libraries {
                executor.add_library(name);
            }
            Ok(())
        })
});

impl Contribute for ExplicitLibrary {
    fn hook_table() -> &'static HookTable<Self> {
        &EXPLICIT_LIBRARY_HOOKS
    }
}

impl_contributor_typed!(ExplicitLibrary);

/// A library made of the artifacts a build phase produced.
///
/// The lookup happens at dispatch time, against the `_results` entry of
/// the current context. No results, or none for this phase, contributes
/// nothing.
#[derive(Debug, Clone)]
pub struct ResultsLibrary {
    phase: PhaseHandle,
}

impl ResultsLibrary {
    pub fn new(phase: PhaseHandle) -> Self {
        ResultsLibrary { phase }
    }

    /// Build from an untyped value, which must be a `PhaseHandle`.
    pub fn try_from_value(value: &dyn Typed) -> Result<Self> {
        let phase = verify_instance::<PhaseHandle>(value)?;
        Ok(ResultsLibrary::new(phase.clone()))
    }

    pub fn phase(&self) -> &PhaseHandle {
        &self.phase
    }
}

static RESULTS_LIBRARY_HOOKS: LazyLock<HookTable<ResultsLibrary>> = LazyLock::new(|| {
    HookTable::<ResultsLibrary>::new().with(CommandType::LINK, |library, executor| {
        let Some(results) = Context::current().results()? else {
            tracing::debug!(phase = ?library.phase, "no phase results published");
            return Ok(());
        };
        let Some(artifacts) = results.get(&library.phase) else {
            tracing::debug!(phase = ?library.phase, "phase has no results");
            return Ok(());
        };
        for artifact in artifacts {
            executor.add_result_library(artifact);
        }
        Ok(())
    })
});

impl Contribute for ResultsLibrary {
    fn hook_table() -> &'static HookTable<Self> {
        &RESULTS_LIBRARY_HOOKS
    }
}

impl_contributor_typed!(ResultsLibrary);
