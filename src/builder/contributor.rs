//! Contributor dispatch.
//!
//! A contributor attaches flags and paths to an executor without either
//! side knowing the other's concrete type. Each contributor kind builds a
//! `HookTable` once, mapping command types to hook functions. Dispatch
//! walks the executor's declared command types in order and calls every
//! hook the table has; types without a hook are skipped.

use crate::builder::executor::{CommandType, Executor};
use crate::util::errors::Result;
use crate::util::types::{TypeInfo, Typed};

/// A per-type contribution function.
pub type Hook<C> = fn(&C, &mut dyn Executor) -> Result<()>;

/// Ordered registry of `(command type, hook)` pairs for one contributor kind.
pub struct HookTable<C> {
    hooks: Vec<(CommandType, Hook<C>)>,
}

impl<C> HookTable<C> {
    pub fn new() -> Self {
        HookTable { hooks: Vec::new() }
    }

    /// Register `hook` for `command_type`, replacing any previous one.
    pub fn with(mut self, command_type: impl Into<CommandType>, hook: Hook<C>) -> Self {
        let command_type = command_type.into();
        match self.hooks.iter().position(|(t, _)| *t == command_type) {
            Some(index) => self.hooks[index].1 = hook,
            None => self.hooks.push((command_type, hook)),
        }
        self
    }

    pub fn get(&self, command_type: &CommandType) -> Option<Hook<C>> {
        self.hooks
            .iter()
            .find(|(t, _)| t == command_type)
            .map(|(_, hook)| *hook)
    }

    /// Command types with a registered hook, in registration order.
    pub fn command_types(&self) -> impl Iterator<Item = &CommandType> {
        self.hooks.iter().map(|(t, _)| t)
    }

    /// Run the hooks matching `executor`'s command types, in the
    /// executor's order.
    pub fn dispatch(&self, contributor: &C, executor: &mut dyn Executor) -> Result<()> {
        let command_types: Vec<CommandType> = executor.command_types().to_vec();
        for command_type in &command_types {
            match self.get(command_type) {
                Some(hook) => {
                    tracing::trace!(%command_type, "running contributor hook");
                    hook(contributor, &mut *executor)?;
                }
                None => tracing::trace!(%command_type, "no hook, skipping"),
            }
        }
        Ok(())
    }
}

impl<C> Default for HookTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented by every contributor kind to expose its hook table.
///
/// The table is expected to live in a `LazyLock` so it is built once.
pub trait Contribute: Sized + 'static {
    fn hook_table() -> &'static HookTable<Self>;
}

/// Anything that can add to a build command.
pub trait Contributor: Typed {
    /// Dispatch into every hook matching the executor's command types.
    fn add_to_command(&self, executor: &mut dyn Executor) -> Result<()>;

    /// Command types this contributor has hooks for.
    fn supported_command_types(&self) -> Vec<CommandType>;
}

impl<C: Contribute + Typed> Contributor for C {
    fn add_to_command(&self, executor: &mut dyn Executor) -> Result<()> {
        tracing::debug!(contributor = self.type_info().name(), "adding to command");
        C::hook_table().dispatch(self, executor)
    }

    fn supported_command_types(&self) -> Vec<CommandType> {
        C::hook_table().command_types().cloned().collect()
    }
}

/// Type description for a contributor kind, parented under `dyn Contributor`.
pub fn contributor_type_info<C: 'static>() -> TypeInfo {
    TypeInfo::of::<C>().extends(TypeInfo::of::<dyn Contributor>())
}

/// Boilerplate `Typed` impl for contributor kinds.
macro_rules! impl_contributor_typed {
    ($ty:ty) => {
        impl $crate::util::types::Typed for $ty {
            fn type_info(&self) -> $crate::util::types::TypeInfo {
                $crate::builder::contributor::contributor_type_info::<$ty>()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
}
pub(crate) use impl_contributor_typed;

/// Let every registered contributor add to `executor`, in order.
///
/// The first failure aborts the pass and is returned unchanged.
pub fn compose(contributors: &[&dyn Contributor], executor: &mut dyn Executor) -> Result<()> {
    for contributor in contributors {
        contributor.add_to_command(executor)?;
    }
    Ok(())
}
