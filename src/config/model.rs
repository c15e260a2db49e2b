// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::CliArgs;
use crate::exec::CommandLine;
use crate::types::RelaySettings;
use crate::watch::{FileMatcher, WatchRoot};

pub const DEFAULT_ROOT: &str = "./";
pub const DEFAULT_PATTERN: &str = r".*\.go$";
pub const DEFAULT_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_BUILD_CMD: &str = "go build main.go";
pub const DEFAULT_FETCH_CMD: &str = "go get";
pub const DEFAULT_ARTIFACT: &str = "./main";

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// root = "."
/// aux = ["../shared"]
/// pattern = '.*\.go$'
/// exclude = ["vendor"]
/// interval_ms = 2000
///
/// [commands]
/// build = "go build main.go"
/// fetch = "go get"
/// artifact = "./main"
///
/// [relay]
/// stdout = true
/// stderr = false
/// ```
///
/// Every section and key is optional; unset keys fall back to CLI flags and
/// then to the `DEFAULT_*` constants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub commands: CommandsSection,

    #[serde(default)]
    pub relay: RelaySection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    /// Primary watch root; the build runs here.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Auxiliary roots, fetched in this order before every build.
    #[serde(default)]
    pub aux: Vec<PathBuf>,

    /// Regular expression matched against file names.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Globs relative to each root for paths that are never scanned.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Poll interval in milliseconds.
    #[serde(default)]
    pub interval_ms: Option<u64>,
}

/// `[commands]` section. Each value is a whitespace-separated command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsSection {
    #[serde(default)]
    pub build: Option<String>,

    #[serde(default)]
    pub fetch: Option<String>,

    /// Artifact produced by the build; executed as the managed process.
    #[serde(default)]
    pub artifact: Option<String>,
}

/// `[relay]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    #[serde(default)]
    pub stdout: Option<bool>,

    #[serde(default)]
    pub stderr: Option<bool>,
}

impl RawConfig {
    /// Layer CLI flags over the file values. Only flags that were given
    /// replace anything; list flags replace the whole list.
    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(root) = &args.workdir {
            self.watch.root = Some(root.clone());
        }
        if !args.aux.is_empty() {
            self.watch.aux = args.aux.clone();
        }
        if let Some(pattern) = &args.pattern {
            self.watch.pattern = Some(pattern.clone());
        }
        if !args.exclude.is_empty() {
            self.watch.exclude = args.exclude.clone();
        }
        if let Some(ms) = args.watch_interval {
            self.watch.interval_ms = Some(ms);
        }
        if let Some(cmd) = &args.build_cmd {
            self.commands.build = Some(cmd.clone());
        }
        if let Some(cmd) = &args.fetch_cmd {
            self.commands.fetch = Some(cmd.clone());
        }
        if let Some(cmd) = &args.artifact {
            self.commands.artifact = Some(cmd.clone());
        }
        if let Some(on) = args.print_stdout {
            self.relay.stdout = Some(on);
        }
        if let Some(on) = args.print_stderr {
            self.relay.stderr = Some(on);
        }
    }

    /// Resolve relative roots against `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(root) = self.watch.root.as_mut() {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
        for aux in self.watch.aux.iter_mut() {
            if aux.is_relative() {
                *aux = base.join(&*aux);
            }
        }
    }
}

/// Validated, ready-to-use settings. Built with `Settings::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Canonical primary root.
    pub primary_root: PathBuf,
    /// Canonical auxiliary roots, in fetch order.
    pub aux_roots: Vec<PathBuf>,
    pub matcher: FileMatcher,
    pub poll_interval: Duration,
    pub build: CommandLine,
    pub fetch: CommandLine,
    pub artifact: CommandLine,
    pub relay: RelaySettings,
}

impl Settings {
    /// Primary root first, then auxiliary roots in order.
    pub fn watch_roots(&self) -> Vec<WatchRoot> {
        std::iter::once(WatchRoot::primary(&self.primary_root))
            .chain(self.aux_roots.iter().map(WatchRoot::auxiliary))
            .collect()
    }
}
