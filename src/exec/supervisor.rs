// src/exec/supervisor.rs

//! Ownership of the single managed process.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::exec::command::CommandLine;
use crate::exec::relay::spawn_relay;
use crate::types::{RelaySettings, StreamKind};

/// Externally visible supervisor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    NoProcess,
    Running { pid: u32 },
}

/// Result of [`Supervisor::restart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Started { pid: u32 },
    StartFailed,
}

/// The currently running child plus the relay tasks reading its pipes.
struct ManagedProcess {
    pid: u32,
    child: Child,
    relays: Vec<JoinHandle<()>>,
}

/// Owns at most one running instance of the built artifact.
///
/// Nothing else holds the child handle: callers only see
/// [`restart`](Self::restart), [`reap`](Self::reap) and
/// [`shutdown`](Self::shutdown). Every child is spawned with
/// `kill_on_drop(true)`, so dropping the supervisor kills it as well.
pub struct Supervisor {
    artifact: CommandLine,
    workdir: PathBuf,
    relay: RelaySettings,
    current: Option<ManagedProcess>,
    launches: u64,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("artifact", &self.artifact)
            .field("state", &self.state())
            .field("launches", &self.launches)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(artifact: CommandLine, workdir: impl Into<PathBuf>, relay: RelaySettings) -> Self {
        Self {
            artifact,
            workdir: workdir.into(),
            relay,
            current: None,
            launches: 0,
        }
    }

    pub fn state(&self) -> SupervisorState {
        match &self.current {
            Some(p) => SupervisorState::Running { pid: p.pid },
            None => SupervisorState::NoProcess,
        }
    }

    pub fn current_pid(&self) -> Option<u32> {
        self.current.as_ref().map(|p| p.pid)
    }

    /// Number of successful launches so far.
    pub fn launches(&self) -> u64 {
        self.launches
    }

    /// Notice a managed process that exited on its own.
    ///
    /// Non-blocking. Returns the exit status if the process was found to
    /// have exited, in which case the supervisor is back in `NoProcess`.
    pub fn reap(&mut self) -> Option<ExitStatus> {
        let proc = self.current.as_mut()?;
        match proc.child.try_wait() {
            Ok(Some(status)) => {
                warn!(pid = proc.pid, %status, "managed process exited");
                self.current = None;
                Some(status)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(pid = proc.pid, error = %err, "could not poll managed process");
                None
            }
        }
    }

    /// Retire the running process (if any), then launch a fresh instance.
    ///
    /// The old process is killed and waited for before the new one starts,
    /// so resources it held (ports, files) are released first.
    pub async fn restart(&mut self) -> RestartOutcome {
        self.retire().await;
        self.start()
    }

    /// Kill the running process, if any, and stop its relays.
    pub async fn shutdown(&mut self) {
        if let Some(relays) = self.retire().await {
            for relay in relays {
                relay.abort();
            }
        }
    }

    /// Kill and wait for the current process. Returns its relay handles so
    /// the caller decides whether to let them drain.
    async fn retire(&mut self) -> Option<Vec<JoinHandle<()>>> {
        let mut proc = self.current.take()?;
        info!(pid = proc.pid, "killing child process");

        if let Err(err) = proc.child.start_kill() {
            // Already exited; `wait` below still collects the status.
            debug!(pid = proc.pid, error = %err, "kill signal not delivered");
        }
        match proc.child.wait().await {
            Ok(status) => debug!(pid = proc.pid, %status, "child process retired"),
            Err(err) => warn!(pid = proc.pid, error = %err, "failed to wait for child process"),
        }

        Some(proc.relays)
    }

    fn start(&mut self) -> RestartOutcome {
        let mut cmd = self.artifact.to_command(&self.workdir);
        cmd.stdin(Stdio::null())
            .stdout(self.stdio_for(StreamKind::Stdout))
            .stderr(self.stdio_for(StreamKind::Stderr))
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                error!(artifact = %self.artifact, error = %err, "execution failed");
                return RestartOutcome::StartFailed;
            }
        };

        let Some(pid) = child.id() else {
            error!(artifact = %self.artifact, "child process exited before its pid was read");
            return RestartOutcome::StartFailed;
        };
        info!(pid, artifact = %self.artifact, "child process started");

        let mut relays = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            debug!(pid, "capturing stdout");
            relays.push(spawn_relay(stdout, pid, StreamKind::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            debug!(pid, "capturing stderr");
            relays.push(spawn_relay(stderr, pid, StreamKind::Stderr));
        }

        self.current = Some(ManagedProcess { pid, child, relays });
        self.launches += 1;
        RestartOutcome::Started { pid }
    }

    /// Relayed streams get a pipe; the others go to the null device so an
    /// unread pipe can never fill up and block the child.
    fn stdio_for(&self, stream: StreamKind) -> Stdio {
        if self.relay.enabled(stream) {
            Stdio::piped()
        } else {
            Stdio::null()
        }
    }
}
