// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Every setting except `--config`, `--log-level` and `--dry-run` is optional
//! so that it can be layered over the config file: CLI value, then file value,
//! then built-in default (see [`crate::config::model::RawConfig::apply_overrides`]).

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchbuild`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchbuild",
    version,
    about = "Monitor source files, rebuild and restart the app when any source file changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional TOML config file. CLI flags override its values.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Primary watch root; the build runs here. Default: `./`.
    #[arg(long, value_name = "PATH")]
    pub workdir: Option<PathBuf>,

    /// Auxiliary watch root; dependency fetch runs in each, in the given order.
    #[arg(long = "aux", value_name = "PATH")]
    pub aux: Vec<PathBuf>,

    /// Regular expression matched against file names. Default: `.*\.go$`.
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Glob (relative to a watch root) for paths that are never scanned.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Polling interval in milliseconds. Default: 2000.
    #[arg(long = "watch-interval", value_name = "MS")]
    pub watch_interval: Option<u64>,

    /// Relay the child's stdout to the log. Default: true.
    #[arg(long = "print-stdout", value_name = "BOOL")]
    pub print_stdout: Option<bool>,

    /// Relay the child's stderr to the log. Default: true.
    #[arg(long = "print-stderr", value_name = "BOOL")]
    pub print_stderr: Option<bool>,

    /// Build command, run in the primary root. Default: `go build main.go`.
    #[arg(long = "build-cmd", value_name = "CMD")]
    pub build_cmd: Option<String>,

    /// Dependency fetch command, run in each auxiliary root. Default: `go get`.
    #[arg(long = "fetch-cmd", value_name = "CMD")]
    pub fetch_cmd: Option<String>,

    /// Artifact produced by the build, executed as the managed process.
    /// Default: `./main`.
    #[arg(long, value_name = "CMD")]
    pub artifact: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and validate config, list matched files, but run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_go_watcher_style_flags() {
        let args = CliArgs::parse_from([
            "watchbuild",
            "--workdir",
            "srv",
            "--aux",
            "lib/a",
            "--aux",
            "lib/b",
            "--pattern",
            r".*\.rs$",
            "--watch-interval",
            "500",
            "--print-stderr",
            "false",
        ]);

        assert_eq!(args.workdir, Some(PathBuf::from("srv")));
        assert_eq!(args.aux, vec![PathBuf::from("lib/a"), PathBuf::from("lib/b")]);
        assert_eq!(args.pattern.as_deref(), Some(r".*\.rs$"));
        assert_eq!(args.watch_interval, Some(500));
        assert_eq!(args.print_stdout, None);
        assert_eq!(args.print_stderr, Some(false));
        assert!(!args.dry_run);
    }
}
