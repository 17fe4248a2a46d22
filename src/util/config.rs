//! Configuration file support for rigging.
//!
//! Two configuration file locations feed the context:
//! - Global: `~/.rigging/config.toml` - User-wide defaults
//! - Project: `.rigging/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every TOML table
//! becomes a context namespace, so
//!
//! ```toml
//! [sdl_config]
//! static = true
//! ```
//!
//! is read back as `sdl_config.static`.

use std::path::{Path, PathBuf};

use crate::core::context::{Context, ContextScope, Layer};
use crate::util::errors::ConfigError;

/// Get the global rigging config directory (~/.rigging).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".rigging"))
}

/// Get the global config path (~/.rigging/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.rigging/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".rigging").join("config.toml")
}

/// Load a config file if it exists.
pub fn load_layer(path: &Path) -> Result<Option<Layer>, ConfigError> {
    if !path.exists() {
        tracing::trace!(path = %path.display(), "no config file");
        return Ok(None);
    }
    let layer = Layer::load(path)?;
    tracing::debug!(path = %path.display(), keys = layer.keys().count(), "loaded config");
    Ok(Some(layer))
}

/// Push the global and then the project config as context layers.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.rigging/config.toml)
/// 2. Global config (~/.rigging/config.toml)
///
/// Missing files are skipped. The returned scopes are innermost-last and
/// pop their layers when dropped.
pub fn load_layers(
    global_path: Option<&Path>,
    project_path: &Path,
) -> Result<Vec<ContextScope>, ConfigError> {
    let mut scopes = Vec::new();
    for path in global_path.into_iter().chain([project_path]) {
        if let Some(layer) = load_layer(path)? {
            scopes.push(Context::enter_layer(layer));
        }
    }
    Ok(scopes)
}
