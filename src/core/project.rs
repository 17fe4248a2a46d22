//! Projects: named sets of phases with variant-aware paths.
//!
//! Everything here is resolved lazily against the *current* context, so
//! the same project can report different variants and output paths inside
//! different scopes (e.g. when sweeping over cross-compilation targets).

use std::fmt;
use std::path::PathBuf;

use crate::core::context::Context;
use crate::core::phase::PhaseHandle;
use crate::core::platform;
use crate::util::errors::{ConfigError, Error, Result};

/// Computes the variant from the current context. `Ok(None)` means "unknown".
pub type VariantResolver = Box<dyn Fn(&Context) -> Result<Option<String>, ConfigError>>;

/// Called by `Project::run_hooks`, in registration order.
pub type ProjectHook = Box<dyn Fn(&Project) -> Result<()>>;

/// How a project finds its variant.
pub enum VariantSource {
    Literal(String),
    Resolver(VariantResolver),
}

impl fmt::Debug for VariantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantSource::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            VariantSource::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// `projects.default_variant`, else the host platform.
pub fn default_variant(ctx: &Context) -> Result<Option<String>, ConfigError> {
    let configured = ctx.get_as::<String>("projects.default_variant")?;
    Ok(configured.or_else(|| platform::host_platform().map(str::to_string)))
}

/// An interrelated set of build phases.
pub struct Project {
    pub name: String,
    pub version: Option<String>,
    pub input_path_relative: Option<PathBuf>,
    pub output_path_relative: Option<PathBuf>,
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    file_name: Option<String>,
    variant: VariantSource,
    phases: Vec<(String, PhaseHandle)>,
    hooks: Vec<ProjectHook>,
}

impl Project {
    /// Create a project that takes its variant from the context or host.
    pub fn new(name: impl Into<String>) -> Self {
        Project {
            name: name.into(),
            version: None,
            input_path_relative: None,
            output_path_relative: None,
            input_path: None,
            output_path: None,
            file_name: None,
            variant: VariantSource::Resolver(Box::new(default_variant)),
            phases: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Use an absolute input path instead of `paths.input`.
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    pub fn with_input_path_relative(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path_relative = Some(path.into());
        self
    }

    /// Use an absolute output path instead of `paths.output`.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_output_path_relative(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path_relative = Some(path.into());
        self
    }

    /// Base name for produced files. Defaults to the project name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Pin the variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = VariantSource::Literal(variant.into());
        self
    }

    /// Compute the variant from the context at call time.
    pub fn with_variant_resolver(
        mut self,
        resolver: impl Fn(&Context) -> Result<Option<String>, ConfigError> + 'static,
    ) -> Self {
        self.variant = VariantSource::Resolver(Box::new(resolver));
        self
    }

    /// Register a phase under `name`. Re-registering a name replaces the
    /// phase but keeps its position.
    pub fn add_phase(&mut self, name: impl Into<String>, phase: PhaseHandle) {
        let name = name.into();
        match self.phases.iter().position(|(n, _)| *n == name) {
            Some(index) => self.phases[index].1 = phase,
            None => self.phases.push((name, phase)),
        }
    }

    /// Phases in registration order.
    pub fn phases(&self) -> impl Iterator<Item = (&str, &PhaseHandle)> {
        self.phases.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn phase(&self, name: &str) -> Option<&PhaseHandle> {
        self.phases.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Reverse lookup by identity. `None` is a normal answer.
    pub fn get_phase_name(&self, phase: &PhaseHandle) -> Option<&str> {
        self.phases
            .iter()
            .find(|(_, p)| p == phase)
            .map(|(n, _)| n.as_str())
    }

    pub fn add_hook(&mut self, hook: impl Fn(&Project) -> Result<()> + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Run every hook in order, stopping at the first failure.
    pub fn run_hooks(&self) -> Result<()> {
        for hook in &self.hooks {
            hook(self)?;
        }
        Ok(())
    }

    /// Resolve the variant against the current context.
    pub fn variant(&self) -> Result<String> {
        let resolved = match &self.variant {
            VariantSource::Literal(v) => Some(v.clone()),
            VariantSource::Resolver(resolver) => resolver(&Context::current())?,
        };

        match resolved {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::UnresolvedVariant {
                project: self.name.clone(),
            }
            .into()),
        }
    }

    pub fn is_windows(&self) -> Result<bool> {
        Ok(platform::is_windows(&self.variant()?))
    }

    pub fn is_linux(&self) -> Result<bool> {
        Ok(platform::is_linux(&self.variant()?))
    }

    pub fn executable_extension(&self) -> Result<&'static str> {
        Ok(platform::executable_extension(&self.variant()?))
    }

    pub fn shared_library_extension(&self) -> Result<&'static str> {
        Ok(platform::shared_library_extension(&self.variant()?))
    }

    pub fn shared_library_prefix(&self) -> Result<&'static str> {
        Ok(platform::shared_library_prefix(&self.variant()?))
    }

    /// Base name for produced files.
    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.name)
    }

    /// Executable file name for the current variant, e.g. `demo.exe`.
    pub fn executable_name(&self) -> Result<String> {
        let variant = self.variant()?;
        Ok(with_extension(
            self.file_name(),
            platform::executable_extension(&variant),
        ))
    }

    /// Shared library file name for the current variant, e.g. `libdemo.so`.
    pub fn shared_library_name(&self) -> Result<String> {
        let variant = self.variant()?;
        let name = format!(
            "{}{}",
            platform::shared_library_prefix(&variant),
            self.file_name()
        );
        Ok(with_extension(
            &name,
            platform::shared_library_extension(&variant),
        ))
    }

    /// The explicit input path, or `paths.input` joined with the relative part.
    pub fn input_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.input_path {
            return Ok(path.clone());
        }
        let base = required_path("paths.input")?;
        Ok(join_optional(base, self.input_path_relative.as_ref()))
    }

    /// The explicit output path, or `paths.output` joined with the relative
    /// part and the variant.
    pub fn output_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.output_path {
            return Ok(path.clone());
        }
        let base = required_path("paths.output")?;
        let path = join_optional(base, self.output_path_relative.as_ref());
        Ok(path.join(self.variant()?))
    }

    /// Where outputs of `output_type` go: `paths.<type>` if configured,
    /// else the project output path joined with `paths.<type>_relative`.
    pub fn get_output_path(&self, output_type: &str) -> Result<PathBuf> {
        let ctx = Context::current();
        if let Some(path) = ctx.get_as::<PathBuf>(&format!("paths.{}", output_type))? {
            return Ok(path);
        }
        let relative = ctx.get_as::<PathBuf>(&format!("paths.{}_relative", output_type))?;
        Ok(join_optional(self.output_path()?, relative.as_ref()))
    }
}

fn required_path(key: &str) -> Result<PathBuf> {
    Context::current()
        .get_as::<PathBuf>(key)?
        .ok_or_else(|| Error::from(ConfigError::Missing { key: key.to_string() }))
}

fn join_optional(base: PathBuf, relative: Option<&PathBuf>) -> PathBuf {
    match relative {
        Some(relative) => base.join(relative),
        None => base,
    }
}

fn with_extension(name: &str, extension: &str) -> String {
    if extension.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", name, extension)
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("variant", &self.variant)
            .field("phases", &self.phases)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = self.variant().ok();
        match (&self.version, variant) {
            (Some(version), Some(variant)) => write!(f, "{} {} ({})", self.name, version, variant),
            (Some(version), None) => write!(f, "{} {}", self.name, version),
            (None, Some(variant)) => write!(f, "{} ({})", self.name, variant),
            (None, None) => write!(f, "{}", self.name),
        }
    }
}
