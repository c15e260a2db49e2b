// src/exec/command.rs

//! Command lines and the pluggable runner for short-lived commands
//! (dependency fetch, build).
//!
//! The controller talks to a [`CommandRunner`] instead of spawning processes
//! itself, so tests can script fetch/build results without a toolchain while
//! production uses [`ProcessRunner`].

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;
use std::str::FromStr;

use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

use crate::errors::Result;

/// A program plus its arguments, split on whitespace. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program path to execute when running in `cwd`.
    ///
    /// A bare name (`go`) is left for `PATH` lookup; a relative path with a
    /// separator (`./main`, `bin/server`) is resolved against `cwd`.
    pub fn resolve_program(&self, cwd: &Path) -> PathBuf {
        let program = Path::new(&self.program);
        let has_separator = self.program.contains('/') || self.program.contains('\\');
        if has_separator && program.is_relative() {
            cwd.join(program)
        } else {
            program.to_path_buf()
        }
    }

    /// Build a tokio `Command` running in `cwd`.
    pub fn to_command(&self, cwd: &Path) -> Command {
        let mut cmd = Command::new(self.resolve_program(cwd));
        cmd.args(&self.args).current_dir(cwd);
        cmd
    }
}

impl FromStr for CommandLine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| "command line must not be empty".to_string())?;
        Ok(CommandLine::new(program, parts))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of a short-lived command: exit status plus captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    /// Captured stdout followed by captured stderr.
    pub text: String,
}

impl CommandOutput {
    pub fn succeeded(text: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            text: text.into(),
        }
    }

    pub fn failed(code: i32, text: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            text: text.into(),
        }
    }
}

/// Trait abstracting how fetch/build commands are executed.
///
/// `Err` means the command could not be run at all (e.g. not found on
/// `PATH`); a command that ran and exited non-zero is `Ok` with
/// `success == false`.
pub trait CommandRunner: Send {
    fn run<'a>(
        &'a mut self,
        cmd: &'a CommandLine,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a mut self,
        cmd: &'a CommandLine,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        Box::pin(async move {
            debug!(cmd = %cmd, cwd = ?cwd, "running command");

            let mut command = cmd.to_command(cwd);
            command.stdin(Stdio::null()).kill_on_drop(true);

            let output = command
                .output()
                .await
                .with_context(|| format!("running `{cmd}` in {:?}", cwd))?;

            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));

            Ok(CommandOutput {
                success: output.status.success(),
                code: output.status.code(),
                text,
            })
        })
    }
}
