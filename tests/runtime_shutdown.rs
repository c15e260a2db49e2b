// tests/runtime_shutdown.rs
#![cfg(unix)]

mod common;
use crate::common::builders::SettingsBuilder;
use crate::common::fake_runner::FakeRunner;
use crate::common::{canonical, init_tracing, is_alive, with_timeout, write_file};

use std::error::Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tokio::sync::mpsc;

use watchbuild::engine::{Controller, Runtime};
use watchbuild::exec::SupervisorState;
use watchbuild::fs::{FileSystem, RealFileSystem};

type TestResult = Result<(), Box<dyn Error>>;

/// Poll the runner until the build has been invoked at least `n` times.
async fn wait_for_builds(runner: &FakeRunner, cmd: &str, n: usize) {
    while runner.dirs_for(cmd).len() < n {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn shutdown_kills_the_managed_process() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let root = canonical(&dir);
    write_file(&root, "main.go", "package main");

    let runner = FakeRunner::new();
    let settings = SettingsBuilder::new(&root).build();
    let controller = Controller::with_parts(&settings, Arc::new(RealFileSystem), runner.clone());

    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(Runtime::new(controller, settings.poll_interval, rx).run());

    with_timeout(wait_for_builds(&runner, "go build main.go", 1)).await;
    // Let the restart that follows the build complete.
    tokio::time::sleep(Duration::from_millis(100)).await;

    tx.send(()).await?;
    let controller = with_timeout(handle).await??;

    assert_eq!(controller.supervisor().launches(), 1);
    assert_eq!(controller.supervisor().state(), SupervisorState::NoProcess);
    Ok(())
}

#[tokio::test]
async fn edits_while_running_restart_then_shutdown_reaps_everything() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let root = canonical(&dir);
    write_file(&root, "a.src", "one");

    let runner = FakeRunner::new();
    let settings = SettingsBuilder::new(&root).pattern(r"\.src$").build();
    let controller = Controller::with_parts(&settings, Arc::new(RealFileSystem), runner.clone());

    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(Runtime::new(controller, settings.poll_interval, rx).run());

    with_timeout(wait_for_builds(&runner, "go build main.go", 1)).await;
    write_file(&root, "a.src", "two");
    with_timeout(wait_for_builds(&runner, "go build main.go", 2)).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    tx.send(()).await?;
    let controller = with_timeout(handle).await??;

    // Every build was followed by exactly one launch.
    let builds = runner.dirs_for("go build main.go").len();
    assert!(builds >= 2);
    assert_eq!(controller.supervisor().launches() as usize, builds);
    assert_eq!(controller.supervisor().state(), SupervisorState::NoProcess);
    Ok(())
}

/// The pid observed while running is gone once the runtime returns.
#[tokio::test]
async fn no_process_survives_the_runtime() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let root = canonical(&dir);
    write_file(&root, "main.go", "package main");

    let runner = FakeRunner::new();
    let settings = SettingsBuilder::new(&root).build();
    let mut controller =
        Controller::with_parts(&settings, Arc::new(RealFileSystem), runner.clone());

    // Drive the first tick by hand to learn the pid, then hand over.
    controller.tick().await;
    let pid = match controller.supervisor().state() {
        SupervisorState::Running { pid } => pid,
        SupervisorState::NoProcess => panic!("expected a running process"),
    };
    assert!(is_alive(pid));

    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(Runtime::new(controller, settings.poll_interval, rx).run());
    tokio::time::sleep(Duration::from_millis(30)).await;
    tx.send(()).await?;
    let controller = with_timeout(handle).await??;

    assert_eq!(controller.supervisor().launches(), 1);
    assert!(!is_alive(pid));
    Ok(())
}

/// Real filesystem whose directory listing stalls, like a huge tree or a
/// hung network mount.
#[derive(Debug)]
struct StallingFileSystem {
    stall: Duration,
}

impl FileSystem for StallingFileSystem {
    fn open_read(&self, path: &Path) -> anyhow::Result<Box<dyn Read + Send>> {
        RealFileSystem.open_read(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        RealFileSystem.is_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        RealFileSystem.is_dir(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        RealFileSystem.is_symlink(path)
    }

    fn canonicalize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        RealFileSystem.canonicalize(path)
    }

    fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        std::thread::sleep(self.stall);
        RealFileSystem.read_dir(path)
    }
}

#[tokio::test]
async fn shutdown_is_not_blocked_by_a_slow_scan() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let root = canonical(&dir);
    write_file(&root, "main.go", "package main");

    let runner = FakeRunner::new();
    let settings = SettingsBuilder::new(&root).build();
    let fs = Arc::new(StallingFileSystem {
        stall: Duration::from_millis(1500),
    });
    let controller = Controller::with_parts(&settings, fs, runner.clone());

    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(Runtime::new(controller, settings.poll_interval, rx).run());
    tokio::time::sleep(Duration::from_millis(50)).await;

    tx.send(()).await?;
    let controller = tokio::time::timeout(Duration::from_millis(750), handle)
        .await
        .expect("runtime must stop while the scan is still running")??;

    assert!(runner.calls().is_empty());
    assert_eq!(controller.supervisor().state(), SupervisorState::NoProcess);
    Ok(())
}
