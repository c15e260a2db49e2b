// src/engine/runtime.rs

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::CommandRunner;

use super::controller::Controller;
use super::TickOutcome;

/// Drives the controller on a fixed poll interval until shutdown is
/// requested.
///
/// Ticks never overlap: the next sleep starts only after the previous tick
/// finished. A shutdown request interrupts either the sleep or a tick in
/// progress; in both cases the managed process is killed before `run`
/// returns.
pub struct Runtime<R: CommandRunner> {
    controller: Controller<R>,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl<R: CommandRunner> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("controller", &self.controller)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> Runtime<R> {
    pub fn new(
        controller: Controller<R>,
        interval: Duration,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            controller,
            interval,
            shutdown_rx,
        }
    }

    /// Main loop. Returns the controller after shutdown so callers (tests)
    /// can inspect its final state.
    pub async fn run(mut self) -> Result<Controller<R>> {
        info!(interval_ms = self.interval.as_millis() as u64, "watchbuild runtime started");

        loop {
            tokio::select! {
                outcome = self.controller.tick() => log_outcome(&outcome),
                Some(()) = self.shutdown_rx.recv() => {
                    info!("shutdown requested during tick");
                    break;
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                Some(()) = self.shutdown_rx.recv() => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        self.controller.shutdown().await;
        info!("runtime exiting");
        Ok(self.controller)
    }
}

fn log_outcome(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Unchanged => {}
        TickOutcome::Restarted { pid } => info!(pid, "done executing new binary"),
        other => debug!(outcome = ?other, "tick aborted"),
    }
}

/// Forward Ctrl-C (and SIGTERM on unix) to the runtime as a shutdown
/// request.
pub fn spawn_signal_listener(tx: mpsc::Sender<()>) {
    tokio::spawn(async move {
        match wait_for_termination().await {
            Ok(signal) => {
                info!(signal, "termination signal received");
                let _ = tx.send(()).await;
            }
            Err(e) => warn!(error = %e, "failed to listen for termination signals"),
        }
    });
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
        _ = term.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "ctrl-c")
}
