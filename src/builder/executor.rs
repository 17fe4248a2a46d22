//! The executor contract contributors write into.
//!
//! An executor accumulates the structured inputs of one build step. The
//! concrete backends (gcc-style, MSVC-style, ...) decide how to render
//! them; contributors only ever append through this trait.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Tag naming a kind of toolchain operation. The set is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommandType(Cow<'static, str>);

impl CommandType {
    /// Compiling sources to objects.
    pub const COMPILE: CommandType = CommandType(Cow::Borrowed("compile"));
    /// Linking objects into executables or libraries.
    pub const LINK: CommandType = CommandType(Cow::Borrowed("link"));

    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        CommandType(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CommandType {
    fn from(tag: &'static str) -> Self {
        CommandType(Cow::Borrowed(tag))
    }
}

impl From<String> for CommandType {
    fn from(tag: String) -> Self {
        CommandType(Cow::Owned(tag))
    }
}

impl std::str::FromStr for CommandType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CommandType(Cow::Owned(s.to_string())))
    }
}

/// A preprocessor define. `value: None` means "define with no value".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
    pub name: String,
    pub value: Option<String>,
}

impl Define {
    pub fn new(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Define {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    /// Simple flag: `-DFOO`.
    pub fn flag(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
        }
    }

    /// Key-value: `-DFOO=bar`.
    pub fn key_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Parse the body of a `-D` flag: `FOO` or `FOO=bar`.
    pub fn parse(body: &str) -> Self {
        match body.split_once('=') {
            Some((name, value)) => Define::key_value(name, value),
            None => Define::flag(body),
        }
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// The mutable target contributors append to.
///
/// Implementations must preserve call order in whatever they generate.
pub trait Executor {
    /// Command types this executor satisfies, in order, without duplicates.
    fn command_types(&self) -> &[CommandType];

    fn add_include_path(&mut self, path: &Path);

    fn define_symbol(&mut self, name: &str, value: Option<&str>);

    fn add_library_path(&mut self, path: &Path);

    fn add_library(&mut self, name: &str);

    /// Reference an artifact produced by an earlier phase.
    fn add_result_library(&mut self, artifact: &Path);

    /// A tool-emitted flag with no structured slot (e.g. `-pthread`).
    fn add_flag(&mut self, flag: &str);
}

/// Recording executor: keeps every append, in order, as structured data.
///
/// Backends can render it; tests and `rigging flags` inspect it directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildInputs {
    pub command_types: Vec<CommandType>,
    pub include_paths: Vec<PathBuf>,
    pub defines: Vec<Define>,
    pub library_paths: Vec<PathBuf>,
    pub libraries: Vec<String>,
    pub result_libraries: Vec<PathBuf>,
    pub flags: Vec<String>,
}

impl BuildInputs {
    /// Create an executor declaring `types`. Duplicates are dropped,
    /// first occurrence wins.
    pub fn new(types: impl IntoIterator<Item = impl Into<CommandType>>) -> Self {
        let mut command_types: Vec<CommandType> = Vec::new();
        for t in types {
            let t = t.into();
            if !command_types.contains(&t) {
                command_types.push(t);
            }
        }
        BuildInputs {
            command_types,
            ..BuildInputs::default()
        }
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.defines.is_empty()
            && self.library_paths.is_empty()
            && self.libraries.is_empty()
            && self.result_libraries.is_empty()
            && self.flags.is_empty()
    }
}

impl Executor for BuildInputs {
    fn command_types(&self) -> &[CommandType] {
        &self.command_types
    }

    fn add_include_path(&mut self, path: &Path) {
        self.include_paths.push(path.to_path_buf());
    }

    fn define_symbol(&mut self, name: &str, value: Option<&str>) {
        self.defines.push(Define::new(name, value));
    }

    fn add_library_path(&mut self, path: &Path) {
        self.library_paths.push(path.to_path_buf());
    }

    fn add_library(&mut self, name: &str) {
        self.libraries.push(name.to_string());
    }

    fn add_result_library(&mut self, artifact: &Path) {
        self.result_libraries.push(artifact.to_path_buf());
    }

    fn add_flag(&mut self, flag: &str) {
        self.flags.push(flag.to_string());
    }
}
