// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::{
    RawConfig, Settings, DEFAULT_ARTIFACT, DEFAULT_BUILD_CMD, DEFAULT_FETCH_CMD,
    DEFAULT_INTERVAL_MS, DEFAULT_PATTERN, DEFAULT_ROOT,
};
use crate::errors::{Result, WatchbuildError};
use crate::exec::CommandLine;
use crate::types::RelaySettings;
use crate::watch::FileMatcher;

impl TryFrom<RawConfig> for Settings {
    type Error = WatchbuildError;

    fn try_from(raw: RawConfig) -> std::result::Result<Self, Self::Error> {
        let root = raw
            .watch
            .root
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));
        let primary_root = resolve_root("watch.root", &root)?;

        let aux_roots = raw
            .watch
            .aux
            .iter()
            .map(|aux| resolve_root("watch.aux", aux))
            .collect::<Result<Vec<_>>>()?;

        let pattern = raw.watch.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        let matcher = FileMatcher::new(pattern, &raw.watch.exclude)?;

        let interval_ms = raw.watch.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(WatchbuildError::ConfigError(
                "watch.interval_ms must be >= 1 (got 0)".to_string(),
            ));
        }

        let build = parse_command("commands.build", raw.commands.build.as_deref(), DEFAULT_BUILD_CMD)?;
        let fetch = parse_command("commands.fetch", raw.commands.fetch.as_deref(), DEFAULT_FETCH_CMD)?;
        let artifact = parse_command(
            "commands.artifact",
            raw.commands.artifact.as_deref(),
            DEFAULT_ARTIFACT,
        )?;

        let defaults = RelaySettings::default();
        let relay = RelaySettings {
            stdout: raw.relay.stdout.unwrap_or(defaults.stdout),
            stderr: raw.relay.stderr.unwrap_or(defaults.stderr),
        };

        Ok(Settings {
            primary_root,
            aux_roots,
            matcher,
            poll_interval: Duration::from_millis(interval_ms),
            build,
            fetch,
            artifact,
            relay,
        })
    }
}

/// Canonicalize a root and require it to be a directory.
fn resolve_root(key: &str, path: &Path) -> Result<PathBuf> {
    let resolved = path.canonicalize().map_err(|e| {
        WatchbuildError::ConfigError(format!("{key}: cannot resolve {:?}: {e}", path))
    })?;
    if !resolved.is_dir() {
        return Err(WatchbuildError::ConfigError(format!(
            "{key}: {:?} is not a directory",
            resolved
        )));
    }
    Ok(resolved)
}

fn parse_command(key: &str, value: Option<&str>, default: &str) -> Result<CommandLine> {
    value
        .unwrap_or(default)
        .parse()
        .map_err(|e| WatchbuildError::ConfigError(format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn raw_with_root(root: &Path) -> RawConfig {
        let mut raw = RawConfig::default();
        raw.watch.root = Some(root.to_path_buf());
        raw
    }

    #[test]
    fn defaults_follow_the_go_workflow() {
        let dir = tempdir().unwrap();
        let settings = Settings::try_from(raw_with_root(dir.path())).unwrap();

        assert_eq!(settings.primary_root, dir.path().canonicalize().unwrap());
        assert!(settings.aux_roots.is_empty());
        assert_eq!(settings.matcher.pattern(), DEFAULT_PATTERN);
        assert_eq!(settings.poll_interval, Duration::from_millis(2000));
        assert_eq!(settings.build.to_string(), "go build main.go");
        assert_eq!(settings.fetch.to_string(), "go get");
        assert_eq!(settings.artifact.to_string(), "./main");
        assert_eq!(settings.relay, RelaySettings::default());
    }

    #[test]
    fn missing_root_is_a_config_error() {
        let dir = tempdir().unwrap();
        let raw = raw_with_root(&dir.path().join("nope"));

        match Settings::try_from(raw) {
            Err(WatchbuildError::ConfigError(msg)) => assert!(msg.contains("watch.root")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn file_as_root_is_rejected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("main.go");
        std::fs::write(&file, "package main").unwrap();

        assert!(matches!(
            Settings::try_from(raw_with_root(&file)),
            Err(WatchbuildError::ConfigError(_))
        ));
    }

    #[test]
    fn bad_pattern_and_zero_interval_are_rejected() {
        let dir = tempdir().unwrap();

        let mut raw = raw_with_root(dir.path());
        raw.watch.pattern = Some("([".to_string());
        assert!(matches!(
            Settings::try_from(raw),
            Err(WatchbuildError::InvalidPattern(_))
        ));

        let mut raw = raw_with_root(dir.path());
        raw.watch.interval_ms = Some(0);
        assert!(matches!(
            Settings::try_from(raw),
            Err(WatchbuildError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_command_is_rejected() {
        let dir = tempdir().unwrap();
        let mut raw = raw_with_root(dir.path());
        raw.commands.build = Some("  ".to_string());

        match Settings::try_from(raw) {
            Err(WatchbuildError::ConfigError(msg)) => assert!(msg.contains("commands.build")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }
}
