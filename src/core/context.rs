//! Scoped, layered configuration context.
//!
//! The context is a stack of layers. Reads walk from the innermost layer
//! outwards and the first layer holding the key wins; writes always go to
//! the innermost layer. The stack is thread-local and always holds a root
//! layer, so `Context::current()` never comes back empty.
//!
//! ```ignore
//! let scope = Context::enter(true);
//! scope.set("sdl_config.static", true)?;
//! assert_eq!(Context::current().get_as::<bool>("sdl_config.static")?, Some(true));
//! drop(scope); // the layer is gone again
//! ```
//!
//! Each thread owns its own stack. Scopes are `!Send`, so a layer can never
//! be popped from a thread other than the one that pushed it.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::phase::{PhaseHandle, PhaseResults};
use crate::core::resolved::{resolve, Resolved};
use crate::core::value::{merge_namespaces, ContextValue, FromContextValue, Namespace};
use crate::util::errors::ConfigError;

/// Context key under which phase artifacts are published.
pub const RESULTS_KEY: &str = "_results";

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static STACK: RefCell<Vec<Frame>> = RefCell::new(vec![Frame::root()]);
}

/// A layer on the stack, tagged with the id of the scope that pushed it.
#[derive(Debug)]
struct Frame {
    scope_id: u64,
    layer: Layer,
}

impl Frame {
    fn root() -> Self {
        Frame {
            scope_id: 0,
            layer: Layer::named("root"),
        }
    }

    fn push(stack: &mut Vec<Frame>, layer: Layer) -> (usize, u64) {
        let depth = stack.len();
        let scope_id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
        stack.push(Frame { scope_id, layer });
        (depth, scope_id)
    }
}

/// One layer of configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    name: Option<String>,
    values: Namespace,
}

impl Layer {
    /// Create an empty, anonymous layer.
    pub fn new() -> Self {
        Layer::default()
    }

    /// Create an empty layer with a name (shown in logs).
    pub fn named(name: impl Into<String>) -> Self {
        Layer {
            name: Some(name.into()),
            values: Namespace::new(),
        }
    }

    /// Create a layer holding `values`.
    pub fn from_namespace(values: Namespace) -> Self {
        Layer { name: None, values }
    }

    /// Rename the layer.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The layer's name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// All values held directly by this layer.
    pub fn values(&self) -> &Namespace {
        &self.values
    }

    /// Top-level keys held directly by this layer.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a dotted key in this layer only.
    pub fn get(&self, key: &str) -> Result<Option<&ContextValue>, ConfigError> {
        let segments = split_key(key)?;
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(invalid_key(key)),
        };

        let mut current = &self.values;
        for (i, segment) in parents.iter().enumerate() {
            match current.get(*segment) {
                None => return Ok(None),
                Some(ContextValue::Namespace(ns)) => current = ns,
                Some(other) => {
                    return Err(ConfigError::NotANamespace {
                        key: key.to_string(),
                        segment: segments[..=i].join("."),
                        found: other.kind(),
                    })
                }
            }
        }

        Ok(current.get(*last))
    }

    /// How many leading `segments` are namespaces in this layer, and
    /// whether a plain value sits at the segment after them.
    fn namespace_depth(&self, segments: &[&str]) -> (usize, bool) {
        let mut current = &self.values;
        for (i, segment) in segments.iter().enumerate() {
            match current.get(*segment) {
                None => return (i, false),
                Some(ContextValue::Namespace(ns)) => current = ns,
                Some(_) => return (i, true),
            }
        }
        (segments.len(), false)
    }

    /// Set a dotted key in this layer, creating intermediate namespaces.
    pub fn set(&mut self, key: &str, value: impl Into<ContextValue>) -> Result<(), ConfigError> {
        let segments = split_key(key)?;
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(invalid_key(key)),
        };

        let mut current = &mut self.values;
        for (i, segment) in parents.iter().enumerate() {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| ContextValue::Namespace(Namespace::new()));
            current = match entry {
                ContextValue::Namespace(ns) => ns,
                other => {
                    return Err(ConfigError::NotANamespace {
                        key: key.to_string(),
                        segment: segments[..=i].join("."),
                        found: other.kind(),
                    })
                }
            };
        }

        current.insert(last.to_string(), value.into());
        Ok(())
    }

    /// Remove a dotted key from this layer, returning the old value.
    pub fn unset(&mut self, key: &str) -> Result<Option<ContextValue>, ConfigError> {
        let segments = split_key(key)?;
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Err(invalid_key(key)),
        };

        let mut current = &mut self.values;
        for segment in parents {
            current = match current.get_mut(*segment) {
                Some(ContextValue::Namespace(ns)) => ns,
                _ => return Ok(None),
            };
        }

        Ok(current.remove(*last))
    }

    /// Merge a whole namespace into this layer; incoming entries win.
    pub fn merge(&mut self, values: Namespace) {
        let current = std::mem::take(&mut self.values);
        self.values = merge_namespaces(current, values);
    }

    /// Parse a TOML document into a layer.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(text)?;
        Ok(Layer::from_namespace(
            table
                .into_iter()
                .map(|(k, v)| (k, ContextValue::from(v)))
                .collect(),
        ))
    }

    /// Read a TOML file into a layer named after the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let layer = Layer::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(layer.with_name(path.display().to_string()))
    }
}

fn invalid_key(key: &str) -> ConfigError {
    ConfigError::InvalidKey {
        key: key.to_string(),
    }
}

fn split_key(key: &str) -> Result<Vec<&str>, ConfigError> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|s| s.trim().is_empty()) {
        return Err(invalid_key(key));
    }
    Ok(segments)
}

/// Merge a run of layers, outermost first, into one view.
fn merged_view(frames: &[Frame]) -> Namespace {
    frames.iter().fold(Namespace::new(), |acc, frame| {
        merge_namespaces(acc, frame.layer.values.clone())
    })
}

/// Handle on the current (innermost) context of this thread.
///
/// The handle is a zero-sized token: every call reads the stack as it is
/// at call time, so a handle taken before entering a scope still sees the
/// scope's values.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    _not_send: PhantomData<*const ()>,
}

impl Context {
    /// The current context. Outside any scope this is the root layer.
    pub fn current() -> Context {
        Context {
            _not_send: PhantomData,
        }
    }

    /// Push a fresh layer; it is popped when the returned scope drops.
    ///
    /// With `inherit`, the merged view of the enclosing layers is copied
    /// into the new layer. Either way, reads fall through to the enclosing
    /// layers.
    pub fn enter(inherit: bool) -> ContextScope {
        let (depth, scope_id) = STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let layer = if inherit {
                Layer::from_namespace(merged_view(&stack))
            } else {
                Layer::new()
            };
            Frame::push(&mut stack, layer)
        });
        tracing::trace!(depth, inherit, "entered context scope");
        ContextScope::at(depth, scope_id)
    }

    /// Push a prepared layer, e.g. one loaded from a config file.
    pub fn enter_layer(layer: Layer) -> ContextScope {
        let (depth, scope_id) = STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            tracing::trace!(depth = stack.len(), layer = ?layer.name(), "entered context layer");
            Frame::push(&mut stack, layer)
        });
        ContextScope::at(depth, scope_id)
    }

    /// Number of active layers, including the root.
    pub fn depth(&self) -> usize {
        STACK.with(|stack| stack.borrow().len())
    }

    /// Look up a dotted key, innermost layer first.
    ///
    /// Namespaces are merged across layers, so `get("sdl_config")` shows
    /// every `sdl_config.*` key visible from here. A plain value further
    /// out is hidden by a namespace at the same path further in.
    pub fn get(&self, key: &str) -> Result<Option<ContextValue>, ConfigError> {
        let segments = split_key(key)?;
        STACK.with(|stack| {
            let stack = stack.borrow();
            let mut merged: Option<Namespace> = None;
            // Leading segments that some inner layer holds as namespaces.
            let mut shadowed = 0;

            for frame in stack.iter().rev() {
                let layer = &frame.layer;
                let (depth, plain_value) = layer.namespace_depth(&segments);
                if plain_value && depth < shadowed {
                    break;
                }
                shadowed = shadowed.max(depth);

                match layer.get(key)? {
                    None => continue,
                    Some(ContextValue::Namespace(ns)) => {
                        merged = Some(match merged.take() {
                            None => ns.clone(),
                            Some(inner) => merge_namespaces(ns.clone(), inner),
                        });
                    }
                    Some(value) => {
                        if merged.is_none() {
                            return Ok(Some(value.clone()));
                        }
                        break;
                    }
                }
            }

            Ok(merged.map(ContextValue::Namespace))
        })
    }

    /// Look up a dotted key and convert it.
    pub fn get_as<T: FromContextValue>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.get(key)?
            .map(|value| T::from_context_value(key, value))
            .transpose()
    }

    /// Whether any layer holds `key`.
    pub fn contains(&self, key: &str) -> Result<bool, ConfigError> {
        Ok(self.get(key)?.is_some())
    }

    /// Set a dotted key in the innermost layer.
    pub fn set(&self, key: &str, value: impl Into<ContextValue>) -> Result<(), ConfigError> {
        let value = value.into();
        self.configure(|layer| layer.set(key, value))
    }

    /// Remove a dotted key from the innermost layer only.
    pub fn unset(&self, key: &str) -> Result<Option<ContextValue>, ConfigError> {
        self.configure(|layer| layer.unset(key))
    }

    /// Resolve a setting: `explicit` if given, else the context value at
    /// `key`, else `default`.
    ///
    /// When `explicit` is given the context is not consulted at all.
    pub fn fallback<T: FromContextValue>(
        &self,
        explicit: Option<T>,
        key: &str,
        default: Option<T>,
    ) -> Result<Resolved<T>, ConfigError> {
        if explicit.is_some() {
            return Ok(resolve(explicit, None, default));
        }
        let from_context = self.get_as::<T>(key)?;
        Ok(resolve(None, from_context, default))
    }

    /// Mutate the innermost layer in place, without pushing a new one.
    ///
    /// The closure must not call back into the context.
    pub fn configure<R>(&self, f: impl FnOnce(&mut Layer) -> R) -> R {
        STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.is_empty() {
                stack.push(Frame::root());
            }
            let last = stack.len() - 1;
            f(&mut stack[last].layer)
        })
    }

    /// Sugar for dotted access below `prefix`.
    pub fn namespace(&self, prefix: impl Into<String>) -> NamespaceRef {
        NamespaceRef {
            context: *self,
            prefix: prefix.into(),
        }
    }

    /// The merged view of every active layer.
    pub fn snapshot(&self) -> Namespace {
        STACK.with(|stack| merged_view(&stack.borrow()))
    }

    /// Publish artifacts produced by `phase` into the innermost `_results`.
    ///
    /// The innermost layer gets a copy of every result visible from here,
    /// so results from enclosing scopes stay readable.
    pub fn record_results(
        &self,
        phase: &PhaseHandle,
        artifacts: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Result<(), ConfigError> {
        let mut results = self.results()?.unwrap_or_default();
        results.add(phase, artifacts);
        self.set(RESULTS_KEY, results)
    }

    /// The innermost published phase results, if any.
    pub fn results(&self) -> Result<Option<PhaseResults>, ConfigError> {
        self.get_as::<PhaseResults>(RESULTS_KEY)
    }
}

/// Dotted access below a fixed prefix: `ctx.namespace("sdl_config").get("command")`
/// reads `sdl_config.command`.
#[derive(Debug, Clone)]
pub struct NamespaceRef {
    context: Context,
    prefix: String,
}

impl NamespaceRef {
    fn key(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }

    pub fn get(&self, key: &str) -> Result<Option<ContextValue>, ConfigError> {
        self.context.get(&self.key(key))
    }

    pub fn get_as<T: FromContextValue>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        self.context.get_as(&self.key(key))
    }

    pub fn set(&self, key: &str, value: impl Into<ContextValue>) -> Result<(), ConfigError> {
        self.context.set(&self.key(key), value)
    }

    pub fn unset(&self, key: &str) -> Result<Option<ContextValue>, ConfigError> {
        self.context.unset(&self.key(key))
    }

    /// A nested namespace below this one.
    pub fn namespace(&self, name: &str) -> NamespaceRef {
        NamespaceRef {
            context: self.context,
            prefix: self.key(name),
        }
    }
}

/// Guard for a pushed context layer.
///
/// Dropping the guard pops its layer, and any layers above it that were
/// leaked, on every exit path including unwinding. A guard whose layer is
/// already gone leaves the stack alone.
#[derive(Debug)]
pub struct ContextScope {
    depth: usize,
    scope_id: u64,
    context: Context,
}

impl ContextScope {
    fn at(depth: usize, scope_id: u64) -> Self {
        ContextScope {
            depth,
            scope_id,
            context: Context::current(),
        }
    }

    /// Stack index of this scope's layer.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Top-level keys held directly by this scope's layer.
    pub fn local_keys(&self) -> Vec<String> {
        STACK.with(|stack| {
            stack
                .borrow()
                .get(self.depth)
                .filter(|frame| frame.scope_id == self.scope_id)
                .map(|frame| frame.layer.keys().map(str::to_string).collect())
                .unwrap_or_default()
        })
    }
}

impl Deref for ContextScope {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.context
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let depth = self.depth;
        let scope_id = self.scope_id;
        // The thread-local may already be gone during thread teardown.
        let _ = STACK.try_with(|stack| {
            if let Ok(mut stack) = stack.try_borrow_mut() {
                if stack.get(depth).is_some_and(|frame| frame.scope_id == scope_id) {
                    stack.truncate(depth.max(1));
                }
            }
        });
        tracing::trace!(depth, "left context scope");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_outside_scope_is_root() {
        let ctx = Context::current();
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.get("anything").unwrap(), None);
    }

    #[test]
    fn test_inner_values_disappear_after_scope() {
        let ctx = Context::current();
        ctx.set("paths.output", "/out").unwrap();

        {
            let scope = Context::enter(false);
            scope.set("paths.output", "/inner").unwrap();
            scope.set("only.inner", true).unwrap();
            assert_eq!(ctx.get_as::<String>("paths.output").unwrap().as_deref(), Some("/inner"));
        }

        assert_eq!(ctx.get_as::<String>("paths.output").unwrap().as_deref(), Some("/out"));
        assert_eq!(ctx.get("only.inner").unwrap(), None);
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn test_reads_cascade_without_inherit() {
        Context::current().set("projects.default_variant", "win64").unwrap();

        let scope = Context::enter(false);
        assert!(scope.local_keys().is_empty());
        assert_eq!(
            scope.get_as::<String>("projects.default_variant").unwrap().as_deref(),
            Some("win64")
        );
    }

    #[test]
    fn test_inherit_copies_ambient_values() {
        Context::current().set("sdl_config.command", "sdl2-config").unwrap();

        let scope = Context::enter(true);
        assert_eq!(scope.local_keys(), vec!["sdl_config".to_string()]);
    }

    #[test]
    fn test_scope_pops_on_early_return() {
        fn failing() -> Result<(), ConfigError> {
            let scope = Context::enter(false);
            scope.set("a.b", 1i64)?;
            scope.set("a.b.c", 2i64)?;
            Ok(())
        }

        let err = failing().unwrap_err();
        assert!(matches!(err, ConfigError::NotANamespace { .. }));
        assert_eq!(Context::current().depth(), 1);
        assert_eq!(Context::current().get("a").unwrap(), None);
    }

    #[test]
    fn test_scope_pops_on_panic() {
        let result = std::panic::catch_unwind(|| {
            let scope = Context::enter(false);
            scope.set("x", 1i64).unwrap();
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(Context::current().depth(), 1);
        assert_eq!(Context::current().get("x").unwrap(), None);
    }

    #[test]
    fn test_outer_scope_drop_discards_leaked_inner() {
        let outer = Context::enter(false);
        let inner = Context::enter(false);
        inner.set("leak", true).unwrap();
        std::mem::forget(inner);

        assert_eq!(Context::current().depth(), 3);
        drop(outer);
        assert_eq!(Context::current().depth(), 1);
        assert_eq!(Context::current().get("leak").unwrap(), None);
    }

    #[test]
    fn test_traversing_scalar_fails() {
        let ctx = Context::current();
        ctx.set("paths", "/not/a/namespace").unwrap();

        let err = ctx.get("paths.input").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot read `paths.input`: `paths` is a string, not a namespace"
        );
    }

    #[test]
    fn test_invalid_keys() {
        let ctx = Context::current();
        for key in ["", "a..b", ".a", "a."] {
            assert!(matches!(ctx.get(key), Err(ConfigError::InvalidKey { .. })), "{key:?}");
        }
    }

    #[test]
    fn test_namespaces_merge_across_layers() {
        let ctx = Context::current();
        ctx.set("sdl_config.command", "/opt/sdl/bin/sdl2-config").unwrap();

        let scope = Context::enter(false);
        scope.set("sdl_config.static", true).unwrap();

        let ns = scope.get_as::<Namespace>("sdl_config").unwrap().unwrap();
        assert_eq!(ns.len(), 2);
        assert_eq!(ns["static"], ContextValue::Bool(true));
    }

    #[test]
    fn test_inner_namespace_shadows_outer_scalar() {
        Context::current().set("tool", "plain").unwrap();
        let scope = Context::enter(false);
        scope.set("tool.command", "x").unwrap();

        let value = scope.get("tool").unwrap().unwrap();
        assert_eq!(value.as_namespace().map(|ns| ns.len()), Some(1));
    }

    #[test]
    fn test_inner_namespace_hides_outer_scalar_below_it() {
        Context::current().set("paths", "/not/a/namespace").unwrap();
        let scope = Context::enter(false);
        scope.set("paths.output", "/build").unwrap();

        assert_eq!(scope.get("paths.input").unwrap(), None);
        assert_eq!(
            scope.get_as::<String>("paths.output").unwrap().as_deref(),
            Some("/build")
        );

        let nested = Context::enter(false);
        nested.set("paths.extra.dir", "/x").unwrap();
        assert_eq!(nested.get("paths.extra.missing").unwrap(), None);
        assert_eq!(nested.get("paths.input").unwrap(), None);
    }

    #[test]
    fn test_outer_value_below_inner_namespace_is_visible() {
        Context::current().set("paths.input", "/src").unwrap();
        let scope = Context::enter(false);
        scope.set("paths.output", "/build").unwrap();

        assert_eq!(
            scope.get_as::<String>("paths.input").unwrap().as_deref(),
            Some("/src")
        );
    }

    #[test]
    fn test_fallback_explicit_wins_over_conflicting_context() {
        let scope = Context::enter(false);
        scope.set("sdl_config.command", "from-context").unwrap();

        let resolved = scope
            .fallback(
                Some("explicit".to_string()),
                "sdl_config.command",
                Some("default".to_string()),
            )
            .unwrap();
        assert_eq!(resolved, Resolved::Explicit("explicit".to_string()));
    }

    #[test]
    fn test_fallback_context_then_default() {
        let scope = Context::enter(false);
        let resolved = scope
            .fallback::<bool>(None, "sdl_config.static", Some(false))
            .unwrap();
        assert_eq!(resolved, Resolved::Default(false));

        scope.set("sdl_config.static", "yes").unwrap();
        let resolved = scope
            .fallback::<bool>(None, "sdl_config.static", Some(false))
            .unwrap();
        assert_eq!(resolved, Resolved::FromContext(true));
    }

    #[test]
    fn test_fallback_skips_context_when_explicit() {
        let scope = Context::enter(false);
        scope.set("sdl_config.static", "maybe").unwrap();

        // The bad context value is never read.
        let resolved = scope.fallback(Some(true), "sdl_config.static", None).unwrap();
        assert_eq!(resolved.value(), Some(true));
        assert!(scope.fallback::<bool>(None, "sdl_config.static", None).is_err());
    }

    #[test]
    fn test_namespace_ref() {
        let scope = Context::enter(false);
        let sdl = scope.namespace("sdl_config");
        sdl.set("prefix", "/usr/local").unwrap();

        assert_eq!(
            scope.get_as::<String>("sdl_config.prefix").unwrap().as_deref(),
            Some("/usr/local")
        );
        assert_eq!(sdl.unset("prefix").unwrap(), Some("/usr/local".into()));
        assert_eq!(sdl.get("prefix").unwrap(), None);
    }

    #[test]
    fn test_record_results() {
        let phase = PhaseHandle::labeled("archive");
        let scope = Context::enter(false);
        scope.record_results(&phase, ["build/libcore.a"]).unwrap();
        scope.record_results(&phase, ["build/libextra.a"]).unwrap();

        let results = scope.results().unwrap().unwrap();
        assert_eq!(results.get(&phase).map(|a| a.len()), Some(2));

        drop(scope);
        assert_eq!(Context::current().results().unwrap(), None);
    }

    #[test]
    fn test_record_results_keeps_outer_results() {
        let outer_phase = PhaseHandle::labeled("outer");
        let inner_phase = PhaseHandle::labeled("inner");

        let outer = Context::enter(false);
        outer.record_results(&outer_phase, ["/out/libouter.a"]).unwrap();
        {
            let inner = Context::enter(false);
            inner.record_results(&inner_phase, ["/out/libinner.a"]).unwrap();

            let results = inner.results().unwrap().unwrap();
            assert_eq!(
                results.get(&outer_phase),
                Some(&[PathBuf::from("/out/libouter.a")][..])
            );
            assert_eq!(results.get(&inner_phase).map(|a| a.len()), Some(1));
        }

        let results = outer.results().unwrap().unwrap();
        assert_eq!(results.get(&inner_phase), None);
        assert_eq!(results.get(&outer_phase).map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_stale_scope_drop_keeps_newer_layers() {
        let outer = Context::enter(false);
        let inner = Context::enter(false);
        drop(outer);
        assert_eq!(Context::current().depth(), 1);

        let first = Context::enter(false);
        let second = Context::enter(false);
        second.set("kept", true).unwrap();
        assert!(inner.local_keys().is_empty());

        drop(inner);
        assert_eq!(Context::current().depth(), 3);
        assert_eq!(Context::current().get_as::<bool>("kept").unwrap(), Some(true));

        drop(second);
        drop(first);
        assert_eq!(Context::current().depth(), 1);
    }

    #[test]
    fn test_layer_from_toml() {
        let layer = Layer::from_toml_str(
            r#"
[paths]
input = "/src"
output = "/build"

[sdl_config]
static = "true"
"#,
        )
        .unwrap();

        assert_eq!(layer.get("paths.input").unwrap(), Some(&"/src".into()));
        let _scope = Context::enter_layer(layer);
        assert_eq!(
            Context::current().get_as::<bool>("sdl_config.static").unwrap(),
            Some(true)
        );
    }

    #[test]
    fn test_threads_have_independent_stacks() {
        let _scope = Context::enter(false);
        Context::current().set("thread.local", true).unwrap();

        std::thread::spawn(|| {
            assert_eq!(Context::current().depth(), 1);
            assert_eq!(Context::current().get("thread.local").unwrap(), None);
        })
        .join()
        .unwrap();
    }
}
