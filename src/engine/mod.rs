// src/engine/mod.rs

//! Control loop for watchbuild.
//!
//! - [`controller`] owns the change detector, the command runner and the
//!   process supervisor, and runs a single tick:
//!   scan → dependency prep → build → restart.
//! - [`runtime`] drives ticks on a fixed interval, listens for termination
//!   signals and guarantees the managed process is shut down on exit.

use std::path::PathBuf;

pub mod controller;
pub mod runtime;

pub use controller::Controller;
pub use runtime::{spawn_signal_listener, Runtime};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No watched file changed; nothing else ran.
    Unchanged,
    /// Dependency fetch failed in `root`; no build, no restart.
    FetchFailed { root: PathBuf, output: String },
    /// Build exited non-zero (or could not start); the managed process was
    /// left untouched.
    BuildFailed { output: String },
    /// Build succeeded and a new managed process is running.
    Restarted { pid: u32 },
    /// Build succeeded but the new artifact could not be launched.
    StartFailed,
}
