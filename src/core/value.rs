//! Values stored in context layers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::phase::PhaseResults;
use crate::util::errors::ConfigError;

/// A nested namespace of context values.
pub type Namespace = BTreeMap<String, ContextValue>;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    List(Vec<ContextValue>),
    Namespace(Namespace),
    /// Phase artifacts, normally found under `_results`.
    Results(PhaseResults),
}

impl ContextValue {
    /// Human-readable name of the value's kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ContextValue::String(_) => "string",
            ContextValue::Bool(_) => "boolean",
            ContextValue::Integer(_) => "integer",
            ContextValue::Float(_) => "float",
            ContextValue::List(_) => "list",
            ContextValue::Namespace(_) => "namespace",
            ContextValue::Results(_) => "phase result set",
        }
    }

    /// Borrow as a namespace, if it is one.
    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            ContextValue::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    /// Borrow as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Render scalars as text. Lists, namespaces and results have no text form.
    pub fn stringify(&self) -> Option<String> {
        match self {
            ContextValue::String(s) => Some(s.clone()),
            ContextValue::Bool(b) => Some(b.to_string()),
            ContextValue::Integer(i) => Some(i.to_string()),
            ContextValue::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }
}

/// Deep-merge `inner` over `outer`. Inner entries shadow outer ones;
/// namespaces present on both sides are merged recursively.
pub fn merge_namespaces(mut outer: Namespace, inner: Namespace) -> Namespace {
    for (key, value) in inner {
        let merged = match (outer.remove(&key), value) {
            (Some(ContextValue::Namespace(o)), ContextValue::Namespace(i)) => {
                ContextValue::Namespace(merge_namespaces(o, i))
            }
            (_, value) => value,
        };
        outer.insert(key, merged);
    }
    outer
}

/// Interpret loosely-typed text as a boolean.
///
/// Accepted (trimmed, case-insensitive): `true`, `yes`, `on`, `1` and
/// `false`, `no`, `off`, `0`, or the empty string.
pub fn parse_bool(key: &str, text: &str) -> Result<bool, ConfigError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: text.to_string(),
        }),
    }
}

/// Conversion from a context value into a concrete setting type.
pub trait FromContextValue: Sized {
    /// Name of the expected kind, for error messages.
    const EXPECTED: &'static str;

    /// Convert `value`, which was found at `key`.
    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError>;
}

fn wrong_type(key: &str, expected: &'static str, value: &ContextValue) -> ConfigError {
    ConfigError::WrongType {
        key: key.to_string(),
        expected,
        found: value.kind(),
    }
}

impl FromContextValue for ContextValue {
    const EXPECTED: &'static str = "any value";

    fn from_context_value(_key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        Ok(value)
    }
}

impl FromContextValue for String {
    const EXPECTED: &'static str = "a string";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        value
            .stringify()
            .ok_or_else(|| wrong_type(key, Self::EXPECTED, &value))
    }
}

impl FromContextValue for PathBuf {
    const EXPECTED: &'static str = "a path";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::String(s) => Ok(PathBuf::from(s)),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl FromContextValue for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::Bool(b) => Ok(b),
            ContextValue::Integer(i) => Ok(i != 0),
            ContextValue::String(s) => parse_bool(key, &s),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl FromContextValue for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::Integer(i) => Ok(i),
            ContextValue::String(ref s) => s
                .trim()
                .parse()
                .map_err(|_| wrong_type(key, Self::EXPECTED, &value)),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl FromContextValue for f64 {
    const EXPECTED: &'static str = "a number";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::Float(f) => Ok(f),
            ContextValue::Integer(i) => Ok(i as f64),
            ContextValue::String(ref s) => s
                .trim()
                .parse()
                .map_err(|_| wrong_type(key, Self::EXPECTED, &value)),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl FromContextValue for Namespace {
    const EXPECTED: &'static str = "a namespace";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::Namespace(ns) => Ok(ns),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl FromContextValue for PhaseResults {
    const EXPECTED: &'static str = "a phase result set";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::Results(results) => Ok(results),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl<T: FromContextValue> FromContextValue for Vec<T> {
    const EXPECTED: &'static str = "a list";

    fn from_context_value(key: &str, value: ContextValue) -> Result<Self, ConfigError> {
        match value {
            ContextValue::List(items) => items
                .into_iter()
                .map(|item| T::from_context_value(key, item))
                .collect(),
            other => Err(wrong_type(key, Self::EXPECTED, &other)),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

impl From<PathBuf> for ContextValue {
    fn from(value: PathBuf) -> Self {
        ContextValue::String(value.to_string_lossy().into_owned())
    }
}

impl From<&std::path::Path> for ContextValue {
    fn from(value: &std::path::Path) -> Self {
        ContextValue::String(value.to_string_lossy().into_owned())
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Integer(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<Namespace> for ContextValue {
    fn from(value: Namespace) -> Self {
        ContextValue::Namespace(value)
    }
}

impl From<PhaseResults> for ContextValue {
    fn from(value: PhaseResults) -> Self {
        ContextValue::Results(value)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(value: Vec<T>) -> Self {
        ContextValue::List(value.into_iter().map(Into::into).collect())
    }
}

impl From<toml::Value> for ContextValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ContextValue::String(s),
            toml::Value::Integer(i) => ContextValue::Integer(i),
            toml::Value::Float(f) => ContextValue::Float(f),
            toml::Value::Boolean(b) => ContextValue::Bool(b),
            toml::Value::Datetime(dt) => ContextValue::String(dt.to_string()),
            toml::Value::Array(items) => {
                ContextValue::List(items.into_iter().map(ContextValue::from).collect())
            }
            toml::Value::Table(table) => ContextValue::Namespace(
                table
                    .into_iter()
                    .map(|(k, v)| (k, ContextValue::from(v)))
                    .collect(),
            ),
        }
    }
}
