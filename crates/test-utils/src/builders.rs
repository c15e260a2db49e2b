#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use watchbuild::config::Settings;
use watchbuild::exec::CommandLine;
use watchbuild::types::RelaySettings;
use watchbuild::watch::FileMatcher;

/// Builder for `Settings` that skips root canonicalization, so tests can
/// point it at in-memory (`MockFileSystem`) paths.
///
/// Defaults: pattern `.*\.go$`, `go build main.go`, `go get`, artifact
/// `sleep 30`, relays off, 10ms interval.
pub struct SettingsBuilder {
    primary_root: PathBuf,
    aux_roots: Vec<PathBuf>,
    pattern: String,
    exclude: Vec<String>,
    build: String,
    fetch: String,
    artifact: String,
    relay: RelaySettings,
    interval: Duration,
}

impl SettingsBuilder {
    pub fn new(primary_root: impl Into<PathBuf>) -> Self {
        Self {
            primary_root: primary_root.into(),
            aux_roots: Vec::new(),
            pattern: r".*\.go$".to_string(),
            exclude: Vec::new(),
            build: "go build main.go".to_string(),
            fetch: "go get".to_string(),
            artifact: "sleep 30".to_string(),
            relay: RelaySettings {
                stdout: false,
                stderr: false,
            },
            interval: Duration::from_millis(10),
        }
    }

    pub fn aux(mut self, root: impl Into<PathBuf>) -> Self {
        self.aux_roots.push(root.into());
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.pattern = pattern.to_string();
        self
    }

    pub fn exclude(mut self, glob: &str) -> Self {
        self.exclude.push(glob.to_string());
        self
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.build = cmd.to_string();
        self
    }

    pub fn fetch_cmd(mut self, cmd: &str) -> Self {
        self.fetch = cmd.to_string();
        self
    }

    pub fn artifact(mut self, cmd: &str) -> Self {
        self.artifact = cmd.to_string();
        self
    }

    pub fn relay(mut self, stdout: bool, stderr: bool) -> Self {
        self.relay = RelaySettings { stdout, stderr };
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn build(self) -> Settings {
        Settings {
            primary_root: self.primary_root,
            aux_roots: self.aux_roots,
            matcher: FileMatcher::new(&self.pattern, &self.exclude)
                .expect("Failed to compile matcher from builder"),
            poll_interval: self.interval,
            build: parse(&self.build),
            fetch: parse(&self.fetch),
            artifact: parse(&self.artifact),
            relay: self.relay,
        }
    }
}

fn parse(cmd: &str) -> CommandLine {
    cmd.parse().expect("Failed to parse command line from builder")
}
