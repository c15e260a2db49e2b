use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use watchbuild::errors::{Result, WatchbuildError};
use watchbuild::exec::{CommandLine, CommandOutput, CommandRunner};

/// One recorded call to the fake runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub cmd: String,
    pub cwd: PathBuf,
}

#[derive(Debug, Clone)]
enum Script {
    Exit(CommandOutput),
    Unstartable,
}

/// A fake command runner that:
/// - records every command it was asked to run, with its working directory
/// - succeeds by default, or returns a scripted result for a (command, cwd)
///
/// Clones share state, so a test can keep one handle while the controller
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<Invocation>>>,
    scripts: Arc<Mutex<HashMap<(String, PathBuf), Script>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `cmd` exit with `code` and print `output` when run in `cwd`.
    pub fn fail_in(&self, cmd: &str, cwd: impl Into<PathBuf>, code: i32, output: &str) {
        self.scripts.lock().unwrap().insert(
            (cmd.to_string(), cwd.into()),
            Script::Exit(CommandOutput::failed(code, output)),
        );
    }

    /// Make `cmd` impossible to start in `cwd` (e.g. not on `PATH`).
    pub fn unstartable_in(&self, cmd: &str, cwd: impl Into<PathBuf>) {
        self.scripts
            .lock()
            .unwrap()
            .insert((cmd.to_string(), cwd.into()), Script::Unstartable);
    }

    /// Remove any scripted result for `cmd` in `cwd`.
    pub fn succeed_in(&self, cmd: &str, cwd: impl Into<PathBuf>) {
        self.scripts
            .lock()
            .unwrap()
            .remove(&(cmd.to_string(), cwd.into()));
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Working directories `cmd` was run in, in call order.
    pub fn dirs_for(&self, cmd: &str) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter(|c| c.cmd == cmd)
            .map(|c| c.cwd)
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(
        &'a mut self,
        cmd: &'a CommandLine,
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutput>> + Send + 'a>> {
        let key = (cmd.to_string(), cwd.to_path_buf());
        self.calls.lock().unwrap().push(Invocation {
            cmd: key.0.clone(),
            cwd: key.1.clone(),
        });
        let script = self.scripts.lock().unwrap().get(&key).cloned();

        Box::pin(async move {
            match script {
                None => Ok(CommandOutput::succeeded(format!("{} ok\n", key.0))),
                Some(Script::Exit(output)) => Ok(output),
                Some(Script::Unstartable) => Err(WatchbuildError::IoError(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{}: command not found", key.0),
                ))),
            }
        })
    }
}
