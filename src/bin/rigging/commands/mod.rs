//! Command implementations.

pub mod flags;
pub mod variant;

use anyhow::Result;

use rigging::core::ContextScope;
use rigging::util::config::{global_config_path, load_layers, project_config_path};
use rigging::{Context, Error};

/// Config file layers plus a scope holding `--set` values.
///
/// Fields drop in declaration order, innermost scope first.
pub struct CommandContext {
    _overrides: ContextScope,
    _layers: Vec<ContextScope>,
}

/// Load `~/.rigging/config.toml` and `.rigging/config.toml`, then push
/// the `--set` values on top.
pub fn enter_context(set: &[(String, String)]) -> Result<CommandContext> {
    let cwd = std::env::current_dir()?;
    let global = global_config_path();
    let layers = load_layers(global.as_deref(), &project_config_path(&cwd)).map_err(Error::from)?;

    let overrides = Context::enter(false);
    for (key, value) in set {
        overrides.set(key, value.as_str()).map_err(Error::from)?;
    }

    Ok(CommandContext {
        _overrides: overrides,
        _layers: layers,
    })
}
