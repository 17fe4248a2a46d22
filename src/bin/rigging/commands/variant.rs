//! `rigging variant` command

use anyhow::Result;

use crate::cli::VariantArgs;
use rigging::{ConfigError, Error, Project};

pub fn execute(args: VariantArgs) -> Result<()> {
    let _ctx = super::enter_context(&args.set)?;

    let mut project = Project::new(&args.name);
    if let Some(version) = &args.version {
        project = project.with_version(version);
    }
    if let Some(variant) = &args.variant {
        project = project.with_variant(variant);
    }

    let variant = project.variant()?;
    println!("project: {}", project);
    println!("variant: {}", variant);
    println!("windows: {}", project.is_windows()?);
    println!("linux: {}", project.is_linux()?);
    println!("executable: {}", project.executable_name()?);
    println!("shared library: {}", project.shared_library_name()?);
    println!("input path: {}", optional_path(project.input_path())?);
    println!("output path: {}", optional_path(project.output_path())?);
    Ok(())
}

/// Paths are optional context; only a missing base path is tolerated.
fn optional_path(path: rigging::Result<std::path::PathBuf>) -> Result<String> {
    match path {
        Ok(path) => Ok(path.display().to_string()),
        Err(Error::Config(ConfigError::Missing { key })) => Ok(format!("(set `{}`)", key)),
        Err(e) => Err(e.into()),
    }
}
