// src/exec/build.rs

//! Build trigger for the primary artifact.

use std::path::Path;

use tracing::{error, info};

use crate::exec::command::{CommandLine, CommandOutput, CommandRunner};

/// Run the build command in the primary root.
///
/// A command that cannot be started at all is reported as a failed build
/// with the spawn error as its output. The full output of a failed build is
/// logged verbatim.
pub async fn run_build<R>(runner: &mut R, build: &CommandLine, root: &Path) -> CommandOutput
where
    R: CommandRunner + ?Sized,
{
    info!(root = ?root, cmd = %build, "building");

    let output = match runner.run(build, root).await {
        Ok(output) => output,
        Err(err) => CommandOutput {
            success: false,
            code: None,
            text: err.to_string(),
        },
    };

    if output.success {
        info!("build successful");
    } else {
        error!(exit_code = ?output.code, "build failed; output:\n{}", output.text);
    }
    output
}
