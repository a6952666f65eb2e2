//! Path resolution for prismactl
//!
//! # Environment Variables
//!
//! - `PRISMACTL_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/prismactl`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `PRISMACTL_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/prismactl` (if set)
//! 3. `~/.config/prismactl`
//!
//! `--config` / `PRISMACTL_CONFIG` name the manifest file itself and take
//! precedence over all of the above.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "PRISMACTL_CONFIG_DIR";

/// Manifest file name inside the config directory
pub const MANIFEST_FILE: &str = "config.toml";

/// Get the prismactl config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("prismactl");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("prismactl");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Resolve the manifest path, preferring an explicit one
pub fn manifest_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(expand(&path.to_string_lossy())),
        None => Ok(config_dir()?.join(MANIFEST_FILE)),
    }
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables are left as written.
pub fn expand(path: &str) -> PathBuf {
    PathBuf::from(expand_str(path))
}

/// Expand ~ and environment variables in any string value
pub fn expand_str(value: &str) -> String {
    shellexpand::full(value)
        .unwrap_or(std::borrow::Cow::Borrowed(value))
        .into_owned()
}
