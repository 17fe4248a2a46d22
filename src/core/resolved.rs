//! Fallback resolution: explicit value, then context value, then default.

/// Where a resolved setting came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    /// Supplied by the caller (e.g. a constructor argument).
    Explicit(T),
    /// Found in the current context.
    FromContext(T),
    /// Built-in default.
    Default(T),
    /// Nothing anywhere.
    Unresolved,
}

/// Apply the fixed precedence: explicit > context > default.
pub fn resolve<T>(explicit: Option<T>, context: Option<T>, default: Option<T>) -> Resolved<T> {
    match (explicit, context, default) {
        (Some(value), _, _) => Resolved::Explicit(value),
        (None, Some(value), _) => Resolved::FromContext(value),
        (None, None, Some(value)) => Resolved::Default(value),
        (None, None, None) => Resolved::Unresolved,
    }
}

impl<T> Resolved<T> {
    /// The resolved value, if any.
    pub fn value(self) -> Option<T> {
        match self {
            Resolved::Explicit(v) | Resolved::FromContext(v) | Resolved::Default(v) => Some(v),
            Resolved::Unresolved => None,
        }
    }

    /// Borrow the resolved value, if any.
    pub fn as_ref(&self) -> Resolved<&T> {
        match self {
            Resolved::Explicit(v) => Resolved::Explicit(v),
            Resolved::FromContext(v) => Resolved::FromContext(v),
            Resolved::Default(v) => Resolved::Default(v),
            Resolved::Unresolved => Resolved::Unresolved,
        }
    }

    /// Transform the value while keeping its origin.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Resolved::Explicit(v) => Resolved::Explicit(f(v)),
            Resolved::FromContext(v) => Resolved::FromContext(f(v)),
            Resolved::Default(v) => Resolved::Default(f(v)),
            Resolved::Unresolved => Resolved::Unresolved,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Resolved::Unresolved)
    }

    /// Short label for logging.
    pub fn origin(&self) -> &'static str {
        match self {
            Resolved::Explicit(_) => "explicit",
            Resolved::FromContext(_) => "context",
            Resolved::Default(_) => "default",
            Resolved::Unresolved => "unresolved",
        }
    }
}
