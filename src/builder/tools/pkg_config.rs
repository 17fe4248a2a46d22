//! Packages configured through `pkg-config`.
//!
//! Context keys live under `pkg_config`: `command`, `static`, `prefix`,
//! `exec_prefix`, `path` (becomes `PKG_CONFIG_PATH`) and `timeout`.
//! `prefix` and `exec_prefix` override the variables of the same name in
//! every queried `.pc` file.

use std::sync::{Arc, LazyLock};

use crate::builder::contributor::{impl_contributor_typed, Contribute, HookTable};
use crate::builder::executor::CommandType;
use crate::builder::flags::{add_cflags, add_libs};
use crate::builder::tools::{ConfigTool, ToolSettings};
use crate::core::context::Context;
use crate::util::errors::Result;
use crate::util::process::ProcessRunner;

pub const DEFAULT_PKG_CONFIG_COMMAND: &str = "pkg-config";

/// Context namespace read by [`PkgConfig`].
pub const PKG_CONFIG_NAMESPACE: &str = "pkg_config";

/// One or more packages known to `pkg-config`.
#[derive(Debug, Clone)]
pub struct PkgConfig {
    packages: Vec<String>,
    path: Option<String>,
    tool: ConfigTool,
}

impl PkgConfig {
    pub fn new(packages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        PkgConfig {
            packages: packages.into_iter().map(Into::into).collect(),
            path: None,
            tool: ConfigTool::new(PKG_CONFIG_NAMESPACE, DEFAULT_PKG_CONFIG_COMMAND),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.tool.overrides_mut().command = Some(command.into());
        self
    }

    pub fn with_static(mut self, static_libs: bool) -> Self {
        self.tool.overrides_mut().static_libs = Some(static_libs);
        self
    }

    /// Override the `prefix` variable of every queried `.pc` file.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tool.overrides_mut().prefix = Some(prefix.into());
        self
    }

    /// Override the `exec_prefix` variable of every queried `.pc` file.
    pub fn with_exec_prefix(mut self, exec_prefix: impl Into<String>) -> Self {
        self.tool.overrides_mut().exec_prefix = Some(exec_prefix.into());
        self
    }

    /// Search path for `.pc` files, passed as `PKG_CONFIG_PATH`.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.tool = self.tool.with_runner(runner);
        self
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn settings(&self) -> Result<ToolSettings> {
        self.tool.settings()
    }

    fn parse(&self, flag: &str, settings: &ToolSettings) -> Result<Vec<String>> {
        let path = Context::current()
            .fallback(self.path.clone(), &self.tool.key("path"), None)?
            .value();

        let mut process = self.tool.process(settings).arg(flag);
        if settings.static_libs {
            process = process.arg("--static");
        }
        if let Some(prefix) = &settings.prefix {
            process = process.arg(format!("--define-variable=prefix={prefix}"));
        }
        if let Some(exec_prefix) = &settings.exec_prefix {
            process = process.arg(format!("--define-variable=exec_prefix={exec_prefix}"));
        }
        process = process.args(&self.packages);
        if let Some(path) = path {
            process = process.env("PKG_CONFIG_PATH", path);
        }
        self.tool.query(&process)
    }
}

static PKG_CONFIG_HOOKS: LazyLock<HookTable<PkgConfig>> = LazyLock::new(|| {
    HookTable::<PkgConfig>::new()
        .with(CommandType::COMPILE, |pkg, executor| {
            let settings = pkg.settings()?;
            let tokens = pkg.parse("--cflags", &settings)?;
            add_cflags(executor, &tokens);
            Ok(())
        })
        .with(CommandType::LINK, |pkg, executor| {
            let settings = pkg.settings()?;
            let tokens = pkg.parse("--libs", &settings)?;
            add_libs(executor, &tokens);
            Ok(())
        })
});

impl Contribute for PkgConfig {
    fn hook_table() -> &'static HookTable<Self> {
        &PKG_CONFIG_HOOKS
    }
}

impl_contributor_typed!(PkgConfig);
