// src/exec/prep.rs

//! Dependency fetch over the auxiliary roots.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::exec::command::{CommandLine, CommandRunner};

/// Why dependency prep stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepFailure {
    /// The auxiliary root whose fetch failed. Roots after it were not tried.
    pub root: PathBuf,
    /// Captured output, or the spawn error if the command could not run.
    pub output: String,
}

/// Run `fetch` in each of `roots`, strictly in order, stopping at the first
/// failure.
pub async fn prepare_dependencies<R>(
    runner: &mut R,
    fetch: &CommandLine,
    roots: &[PathBuf],
) -> Result<(), PrepFailure>
where
    R: CommandRunner + ?Sized,
{
    for root in roots {
        fetch_one(runner, fetch, root).await?;
    }
    Ok(())
}

async fn fetch_one<R>(runner: &mut R, fetch: &CommandLine, root: &Path) -> Result<(), PrepFailure>
where
    R: CommandRunner + ?Sized,
{
    info!(root = ?root, cmd = %fetch, "fetching dependencies");

    let output = match runner.run(fetch, root).await {
        Ok(output) => output,
        Err(err) => {
            error!(root = ?root, cmd = %fetch, error = %err, "dependency fetch could not be started");
            return Err(PrepFailure {
                root: root.to_path_buf(),
                output: err.to_string(),
            });
        }
    };

    if output.success {
        info!(root = ?root, "dependencies fetched");
        return Ok(());
    }

    error!(
        root = ?root,
        exit_code = ?output.code,
        "dependency fetch failed; output:\n{}",
        output.text
    );
    Err(PrepFailure {
        root: root.to_path_buf(),
        output: output.text,
    })
}
