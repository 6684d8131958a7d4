//! Application directory paths for toprank.
//!
//! Uses the [`dirs`] crate for platform-appropriate resolution.
//!
//! # Environment Overrides
//!
//! - `TOPRANK_CONFIG_DIR` — overrides [`config_dir`]

use std::path::PathBuf;

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/toprank/` by default. Override with
/// the `TOPRANK_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("TOPRANK_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("toprank"))
        .unwrap_or_else(|| PathBuf::from("/tmp/toprank-config"))
}

/// Default config file: `config_dir()/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}
