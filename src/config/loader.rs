// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfig, Settings};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfig`.
///
/// This only performs TOML deserialization and resolves relative roots
/// against the file's directory; it does **not** validate anything. Use
/// [`load_settings`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut config: RawConfig = toml::from_str(&contents)?;
    config.resolve_paths(&config_root_dir(path));

    Ok(config)
}

/// Build validated settings from the CLI arguments.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads the TOML file given by `--config`, if any.
/// - Layers the remaining CLI flags over it.
/// - Applies defaults and validates (roots exist, pattern compiles,
///   commands are non-empty).
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let mut raw = match &args.config {
        Some(path) => {
            debug!(config = ?path, "loading config file");
            load_from_path(path)?
        }
        None => RawConfig::default(),
    };
    raw.apply_overrides(args);
    Settings::try_from(raw)
}

/// Directory that relative paths inside a config file are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "configs/watchbuild.toml"),
///   we use that directory.
/// - If it's just a bare filename like "watchbuild.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
