#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;

pub use watchbuild_test_utils::builders;
pub use watchbuild_test_utils::fake_runner;
pub use watchbuild_test_utils::log_capture::LogCapture;
pub use watchbuild_test_utils::{init_tracing, with_timeout};

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, contents).expect("write test file");
    path
}

/// Canonical path of a temp dir, so it compares equal to what the
/// supervisor and runner see.
pub fn canonical(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().canonicalize().expect("canonicalize temp dir")
}

/// Whether a process with `pid` still exists (unix `kill -0`).
pub fn is_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
