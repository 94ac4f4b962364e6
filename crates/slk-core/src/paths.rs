//! Location of `config.toml`.
//!
//! `--config` wins when given; a directory there means `<dir>/config.toml`.
//! Otherwise the file lives in `$XDG_CONFIG_HOME/slk`, then the platform
//! config dir, then `~/.config/slk`.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::{APP_NAME, AppConfig};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolved file locations for one run.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// The `config.toml` that is read, and created on first run.
    pub config_file: PathBuf,
}

impl AppPaths {
    /// Resolve the config file, honoring a `--config` override.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be found or the override
    /// cannot be expanded.
    pub fn discover(override_path: Option<&Path>) -> Result<Self> {
        let config_file = if let Some(path) = override_path {
            let expanded = expand_path(path)?;
            if expanded.is_dir() {
                expanded.join(CONFIG_FILE_NAME)
            } else {
                expanded
            }
        } else {
            default_config_dir()?.join(CONFIG_FILE_NAME)
        };

        if config_file.parent().is_none() {
            return Err(anyhow!("not a usable config file path: {}", config_file.display()));
        }
        Ok(Self { config_file })
    }
}

impl fmt::Display for AppPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config: {}", self.config_file.display())
    }
}

/// [`expand_str_path`] for paths; non-UTF-8 paths are returned unchanged.
///
/// # Errors
///
/// Returns an error if shell expansion fails.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    path.to_str()
        .map_or_else(|| Ok(path.to_path_buf()), expand_str_path)
}

/// Expand `~` and `$VAR` references, as used by `--config` and `[logging] file`.
///
/// # Errors
///
/// Returns an error if a referenced variable is unset.
pub fn expand_str_path(text: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(text).with_context(|| format!("expanding path {text}"))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Directory holding `config.toml` when `--config` is not given.
///
/// # Errors
///
/// Returns an error if neither a config nor a home directory is known.
pub fn default_config_dir() -> Result<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .map(|base| base.join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine configuration directory"))
}

/// Write the defaults to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }

    let body = toml::to_string_pretty(&AppConfig::default())
        .context("serializing default config to TOML")?;
    let contents = format!(
        "# Configuration for {APP_NAME}\n\
         # File: {}\n\
         # Set SLACK_API_TOKEN or [slack] token to a user token (xoxp-*).\n\
         \n\
         {body}",
        path.display()
    );
    fs::write(path, contents).with_context(|| format!("writing config file to {}", path.display()))
}
