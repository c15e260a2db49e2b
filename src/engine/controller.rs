// src/engine/controller.rs

//! One tick of the control loop.
//!
//! The controller is the single owner of all mutable state (snapshot,
//! supervisor). It has no channels and never spawns anything except through
//! its runner, its supervisor and the blocking pool used for scans, so a test
//! can drive it tick by tick.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::engine::TickOutcome;
use crate::exec::{
    prepare_dependencies, run_build, CommandLine, CommandRunner, ProcessRunner, RestartOutcome,
    Supervisor,
};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{ChangeDetector, ScanReport};

pub struct Controller<R: CommandRunner> {
    /// Shared with the blocking scan task; locked only while scanning.
    detector: Arc<Mutex<ChangeDetector>>,
    runner: R,
    supervisor: Supervisor,
    primary_root: PathBuf,
    aux_roots: Vec<PathBuf>,
    build: CommandLine,
    fetch: CommandLine,
}

impl<R: CommandRunner> std::fmt::Debug for Controller<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("primary_root", &self.primary_root)
            .field("aux_roots", &self.aux_roots)
            .field("supervisor", &self.supervisor)
            .finish_non_exhaustive()
    }
}

impl Controller<ProcessRunner> {
    /// Production controller: real filesystem, real processes.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_parts(settings, Arc::new(RealFileSystem), ProcessRunner)
    }
}

impl<R: CommandRunner> Controller<R> {
    pub fn with_parts(settings: &Settings, fs: Arc<dyn FileSystem>, runner: R) -> Self {
        let detector = ChangeDetector::new(fs, settings.watch_roots(), settings.matcher.clone());
        let supervisor = Supervisor::new(
            settings.artifact.clone(),
            settings.primary_root.clone(),
            settings.relay,
        );
        Self {
            detector: Arc::new(Mutex::new(detector)),
            runner,
            supervisor,
            primary_root: settings.primary_root.clone(),
            aux_roots: settings.aux_roots.clone(),
            build: settings.build.clone(),
            fetch: settings.fetch.clone(),
        }
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    /// Run one tick: scan, and on change fetch, build and restart.
    ///
    /// The running process is only touched after the build succeeded.
    pub async fn tick(&mut self) -> TickOutcome {
        self.supervisor.reap();

        let report = self.scan().await;
        if !report.any_changed() {
            return TickOutcome::Unchanged;
        }
        let changed: Vec<_> = report.changed_roots().collect();
        info!(roots = ?changed, "change detected");

        if let Err(failure) =
            prepare_dependencies(&mut self.runner, &self.fetch, &self.aux_roots).await
        {
            warn!(root = ?failure.root, "dependency prep failed; skipping build");
            return TickOutcome::FetchFailed {
                root: failure.root,
                output: failure.output,
            };
        }

        let build = run_build(&mut self.runner, &self.build, &self.primary_root).await;
        if !build.success {
            if let Some(pid) = self.supervisor.current_pid() {
                info!(pid, "keeping previous process running");
            }
            return TickOutcome::BuildFailed {
                output: build.text,
            };
        }

        match self.supervisor.restart().await {
            RestartOutcome::Started { pid } => {
                debug!(pid, launches = self.supervisor.launches(), "restart completed");
                TickOutcome::Restarted { pid }
            }
            RestartOutcome::StartFailed => TickOutcome::StartFailed,
        }
    }

    /// Walk and hash on the blocking pool so a slow tree never stalls the
    /// runtime. If the tick is abandoned the scan still runs to completion in
    /// the background and the snapshot stays consistent.
    async fn scan(&self) -> ScanReport {
        let detector = Arc::clone(&self.detector);
        let joined = tokio::task::spawn_blocking(move || {
            let mut detector = match detector.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            detector.scan()
        })
        .await;

        match joined {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "scan task failed; treating tick as unchanged");
                ScanReport::default()
            }
        }
    }

    /// Kill the managed process, if any.
    pub async fn shutdown(&mut self) {
        self.supervisor.shutdown().await;
    }
}
