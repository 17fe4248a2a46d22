//! Error types for composition.
//!
//! Every fatal failure propagates unmodified to whoever started the
//! composition pass. Absence (no phase results, no phase name) is never
//! an error and never shows up here.

use std::path::PathBuf;
use std::time::Duration;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any failure raised while composing a build command.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum Error {
    #[error("not {relation} of {expected}: {actual}")]
    #[diagnostic(code(rigging::types::mismatch))]
    TypeMismatch {
        relation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ExternalTool(#[from] ExternalToolError),
}

/// Malformed or inconsistent configuration.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("invalid context key `{key}`")]
    #[diagnostic(code(rigging::config::invalid_key))]
    InvalidKey { key: String },

    #[error("cannot read `{key}`: `{segment}` is a {found}, not a namespace")]
    #[diagnostic(code(rigging::config::not_a_namespace))]
    NotANamespace {
        key: String,
        segment: String,
        found: &'static str,
    },

    #[error("`{key}` is a {found}, expected {expected}")]
    #[diagnostic(code(rigging::config::wrong_type))]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{key}` is not a boolean: `{value}`")]
    #[diagnostic(
        code(rigging::config::bad_bool),
        help("use one of: true, yes, on, 1, false, no, off, 0")
    )]
    InvalidBool { key: String, value: String },

    #[error("`{key}` is not configured")]
    #[diagnostic(code(rigging::config::missing))]
    Missing { key: String },

    #[error("cannot determine the variant for project `{project}`")]
    #[diagnostic(
        code(rigging::config::unresolved_variant),
        help("set `projects.default_variant` or give the project an explicit variant")
    )]
    UnresolvedVariant { project: String },

    #[error("failed to read config file: {}", path.display())]
    #[diagnostic(code(rigging::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {}", path.display())]
    #[diagnostic(code(rigging::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure to run or understand an external configuration tool.
///
/// Each variant carries the full command line that was attempted.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ExternalToolError {
    #[error("failed to run: '{command_line}' (executable not found)")]
    #[diagnostic(code(rigging::tool::not_found))]
    NotFound { command_line: String },

    #[error("failed to run: '{command_line}'")]
    #[diagnostic(code(rigging::tool::spawn))]
    Spawn {
        command_line: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run: '{command_line}' (exit code {code:?})")]
    #[diagnostic(code(rigging::tool::failed))]
    Failed {
        command_line: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run: '{command_line}' (timed out after {}s)", timeout.as_secs())]
    #[diagnostic(code(rigging::tool::timeout))]
    TimedOut {
        command_line: String,
        timeout: Duration,
    },

    #[error("unreadable output from '{command_line}': {reason}")]
    #[diagnostic(code(rigging::tool::output))]
    UnreadableOutput {
        command_line: String,
        reason: String,
    },
}

impl ExternalToolError {
    /// The command line that was attempted.
    pub fn command_line(&self) -> &str {
        match self {
            ExternalToolError::NotFound { command_line }
            | ExternalToolError::Spawn { command_line, .. }
            | ExternalToolError::Failed { command_line, .. }
            | ExternalToolError::TimedOut { command_line, .. }
            | ExternalToolError::UnreadableOutput { command_line, .. } => command_line,
        }
    }
}

impl Error {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::TypeMismatch { .. } => Diagnostic::error(self.to_string()).with_suggestion(
                "Check the value passed where the build description was assembled",
            ),

            Error::Config(ConfigError::UnresolvedVariant { .. }) => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::SET_VARIANT)
            }

            Error::Config(ConfigError::Read { path, .. } | ConfigError::Parse { path, .. }) => {
                Diagnostic::error(self.to_string()).with_location(path.clone())
            }

            Error::Config(_) => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::CHECK_CONFIG)
            }

            Error::ExternalTool(ExternalToolError::NotFound { .. }) => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::TOOL_NOT_FOUND)
            }

            Error::ExternalTool(ExternalToolError::Failed { stderr, .. }) => {
                let mut diag = Diagnostic::error(self.to_string());
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    diag = diag.with_context(line.trim());
                }
                diag
            }

            Error::ExternalTool(ExternalToolError::TimedOut { .. }) => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::TOOL_TIMEOUT)
            }

            Error::ExternalTool(_) => Diagnostic::error(self.to_string()),
        }
    }
}
