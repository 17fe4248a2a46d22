//! External configuration tools as contributors.
//!
//! `ConfigTool` is the shared engine: it resolves `<namespace>.*` settings
//! through the current context, runs the tool, and tokenizes its output.
//! The concrete contributors decide which arguments to pass and how the
//! resulting tokens are routed.

pub mod pkg_config;
pub mod sdl;

use std::sync::Arc;
use std::time::Duration;

use crate::core::context::{Context, Layer};
use crate::core::resolved::Resolved;
use crate::util::errors::{ConfigError, ExternalToolError, Result};
use crate::util::process::{ProcessBuilder, ProcessRunner, SystemRunner};
use crate::util::split::split;

pub use pkg_config::PkgConfig;
pub use sdl::{configure_sdl_config, SdlConfig};

/// Settings a caller can pin on a tool contributor. `None` defers to the
/// context and then to the built-in default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOverrides {
    pub command: Option<String>,
    pub static_libs: Option<bool>,
    pub prefix: Option<String>,
    pub exec_prefix: Option<String>,
    pub timeout: Option<Duration>,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub command: String,
    pub static_libs: bool,
    pub prefix: Option<String>,
    pub exec_prefix: Option<String>,
    pub timeout: Option<Duration>,
}

/// Generic `*-config` script engine.
#[derive(Debug, Clone)]
pub struct ConfigTool {
    namespace: &'static str,
    default_command: &'static str,
    overrides: ToolOverrides,
    runner: Arc<dyn ProcessRunner>,
}

impl ConfigTool {
    /// A tool reading `<namespace>.*` context keys, running
    /// `default_command` unless told otherwise.
    pub fn new(namespace: &'static str, default_command: &'static str) -> Self {
        ConfigTool {
            namespace,
            default_command,
            overrides: ToolOverrides::default(),
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_overrides(mut self, overrides: ToolOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    pub fn default_command(&self) -> &'static str {
        self.default_command
    }

    pub fn overrides(&self) -> &ToolOverrides {
        &self.overrides
    }

    pub(crate) fn overrides_mut(&mut self) -> &mut ToolOverrides {
        &mut self.overrides
    }

    /// Dotted context key for `setting`.
    pub fn key(&self, setting: &str) -> String {
        format!("{}.{}", self.namespace, setting)
    }

    /// Resolve every setting against the current context.
    pub fn settings(&self) -> Result<ToolSettings> {
        let ctx = Context::current();
        let o = &self.overrides;

        let command = ctx.fallback(
            o.command.clone(),
            &self.key("command"),
            Some(self.default_command.to_string()),
        )?;
        tracing::trace!(key = %self.key("command"), origin = command.origin(), "resolved");
        let command = command
            .value()
            .unwrap_or_else(|| self.default_command.to_string());

        let static_libs = ctx
            .fallback(o.static_libs, &self.key("static"), Some(false))?
            .value()
            .unwrap_or(false);
        let prefix = ctx
            .fallback(o.prefix.clone(), &self.key("prefix"), None)?
            .value();
        let exec_prefix = ctx
            .fallback(o.exec_prefix.clone(), &self.key("exec_prefix"), None)?
            .value();

        let timeout_key = self.key("timeout");
        let timeout = match ctx.fallback(o.timeout.map(|t| t.as_secs_f64()), &timeout_key, None)? {
            Resolved::Explicit(_) => o.timeout,
            resolved => resolved
                .value()
                .map(|secs| seconds(&timeout_key, secs))
                .transpose()?,
        };

        Ok(ToolSettings {
            command,
            static_libs,
            prefix,
            exec_prefix,
            timeout,
        })
    }

    /// Start a process for `settings.command` with its timeout applied.
    pub fn process(&self, settings: &ToolSettings) -> ProcessBuilder {
        ProcessBuilder::new(&settings.command).timeout(settings.timeout)
    }

    /// Run `process` and split its trimmed stdout into words.
    ///
    /// All tokens are produced before the caller appends anything, so a
    /// failure here leaves the executor untouched.
    pub fn query(&self, process: &ProcessBuilder) -> Result<Vec<String>> {
        let command_line = process.display_command();
        let output = self.runner.run(process)?.check(&command_line)?;
        let text = output.stdout_text(&command_line)?;
        let tokens = split(text.trim()).map_err(|e| ExternalToolError::UnreadableOutput {
            command_line: command_line.clone(),
            reason: e.to_string(),
        })?;
        tracing::debug!(command = %command_line, tokens = tokens.len(), "config tool output");
        Ok(tokens)
    }
}

fn seconds(key: &str, secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::WrongType {
        key: key.to_string(),
        expected: "a non-negative number of seconds",
        found: "negative or non-finite number",
    })
}

/// Write `overrides` into `layer` under `namespace`.
///
/// Unset overrides remove the corresponding key, so a later lookup falls
/// through to enclosing layers and defaults. `command` falls back to
/// `default_command`.
pub fn configure_tool(
    layer: &mut Layer,
    namespace: &str,
    default_command: &str,
    overrides: &ToolOverrides,
) -> Result<(), ConfigError> {
    let key = |setting: &str| format!("{namespace}.{setting}");

    let command = overrides
        .command
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| default_command.to_string());
    layer.set(&key("command"), command)?;

    match overrides.static_libs {
        Some(value) => layer.set(&key("static"), value)?,
        None => {
            layer.unset(&key("static"))?;
        }
    }
    let paths = [
        ("prefix", &overrides.prefix),
        ("exec_prefix", &overrides.exec_prefix),
    ];
    for (setting, value) in paths {
        match value {
            Some(value) => layer.set(&key(setting), value.as_str())?,
            None => {
                layer.unset(&key(setting))?;
            }
        }
    }
    match overrides.timeout {
        Some(timeout) => layer.set(&key("timeout"), timeout.as_secs_f64())?,
        None => {
            layer.unset(&key("timeout"))?;
        }
    }
    Ok(())
}
