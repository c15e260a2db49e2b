// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] defines command lines and the `CommandRunner` seam used for
//!   the short-lived fetch and build commands.
//! - [`prep`] runs the dependency fetch across auxiliary roots.
//! - [`build`] runs the build in the primary root.
//! - [`supervisor`] owns the single long-running managed process.
//! - [`relay`] forwards that process's stdout/stderr lines to the log.

pub mod build;
pub mod command;
pub mod prep;
pub mod relay;
pub mod supervisor;

pub use build::run_build;
pub use command::{CommandLine, CommandOutput, CommandRunner, ProcessRunner};
pub use prep::{prepare_dependencies, PrepFailure};
pub use relay::spawn_relay;
pub use supervisor::{RestartOutcome, Supervisor, SupervisorState};
