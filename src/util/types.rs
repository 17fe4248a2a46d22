//! Runtime type guards for values handed around as `&dyn Typed`.
//!
//! Failures name both the expected and the actual type.

use std::any::{Any, TypeId};
use std::fmt;

use crate::util::errors::Error;

/// Runtime description of a type and its declared parent.
///
/// Parents are declared explicitly: contributor kinds name
/// `dyn Contributor` as theirs.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    parent: Option<Box<TypeInfo>>,
}

impl TypeInfo {
    /// Describe `T` with no parent.
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeInfo {
            id: TypeId::of::<T>(),
            name: short_name(std::any::type_name::<T>()),
            parent: None,
        }
    }

    /// Declare `parent` as the supertype of this type.
    pub fn extends(mut self, parent: TypeInfo) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Short type name, without the module path.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared parent, if any.
    pub fn parent(&self) -> Option<&TypeInfo> {
        self.parent.as_deref()
    }

    /// True if this type is `other` or declares it somewhere up its parent chain.
    pub fn is_subtype_of(&self, other: &TypeInfo) -> bool {
        let mut current = Some(self);
        while let Some(info) = current {
            if info.id == other.id {
                return true;
            }
            current = info.parent();
        }
        false
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A value that can describe its own runtime type.
pub trait Typed: Any {
    /// Runtime type description, including declared parents.
    fn type_info(&self) -> TypeInfo;

    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Either a type or an instance, for `verify_type_or_subclass`.
pub enum TypeArg<'a> {
    Type(&'a TypeInfo),
    Instance(&'a dyn Typed),
}

/// Fail unless `value` is an instance of `expected` (or of a subtype).
pub fn verify_type(value: &dyn Typed, expected: &TypeInfo) -> Result<(), Error> {
    let actual = value.type_info();
    if actual.is_subtype_of(expected) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            relation: "an instance",
            expected: expected.name(),
            actual: actual.name(),
        })
    }
}

/// Fail unless `value` is `expected` or one of its declared subtypes.
pub fn verify_subclass(value: &TypeInfo, expected: &TypeInfo) -> Result<(), Error> {
    if value.is_subtype_of(expected) {
        Ok(())
    } else {
        Err(Error::TypeMismatch {
            relation: "a subclass",
            expected: expected.name(),
            actual: value.name(),
        })
    }
}

/// Dispatch to `verify_subclass` for types and `verify_type` for instances.
pub fn verify_type_or_subclass(value: TypeArg<'_>, expected: &TypeInfo) -> Result<(), Error> {
    match value {
        TypeArg::Type(info) => verify_subclass(info, expected),
        TypeArg::Instance(instance) => verify_type(instance, expected),
    }
}

/// Downcast `value` to a concrete `T`, failing with a type mismatch.
pub fn verify_instance<T: Typed>(value: &dyn Typed) -> Result<&T, Error> {
    value.as_any().downcast_ref::<T>().ok_or_else(|| Error::TypeMismatch {
        relation: "an instance",
        expected: TypeInfo::of::<T>().name(),
        actual: value.type_info().name(),
    })
}

/// Strip the module path from a `type_name`.
///
/// `rigging::core::phase::PhaseHandle` becomes `PhaseHandle` and
/// `dyn rigging::builder::Contributor` becomes `Contributor`. Generic
/// names are returned untouched.
fn short_name(full: &'static str) -> &'static str {
    let plain = full.strip_prefix("dyn ").unwrap_or(full);
    if plain.contains('<') || plain.contains(' ') {
        return full;
    }
    plain.rsplit("::").next().unwrap_or(plain)
}
