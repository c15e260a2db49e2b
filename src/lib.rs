// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_settings, Settings};
use crate::engine::{spawn_signal_listener, Controller, Runtime};
use crate::fs::RealFileSystem;
use crate::watch::ChangeDetector;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI flags)
/// - the controller (change detector, runner, supervisor)
/// - Ctrl-C / SIGTERM handling
/// - the polling runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    info!(root = ?settings.primary_root, "using working directory");

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    spawn_signal_listener(shutdown_tx);

    let controller = Controller::from_settings(&settings);
    let runtime = Runtime::new(controller, settings.poll_interval, shutdown_rx);
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: resolved settings and currently matched files.
fn print_dry_run(settings: &Settings) {
    println!("watchbuild dry-run");
    println!("  primary root = {}", settings.primary_root.display());
    for aux in &settings.aux_roots {
        println!("  aux root     = {}", aux.display());
    }
    println!("  pattern      = {}", settings.matcher.pattern());
    println!("  interval     = {}ms", settings.poll_interval.as_millis());
    println!("  build        = {}", settings.build);
    println!("  fetch        = {}", settings.fetch);
    println!("  artifact     = {}", settings.artifact);
    println!(
        "  relay        = stdout:{} stderr:{}",
        settings.relay.stdout, settings.relay.stderr
    );
    println!();

    let detector = ChangeDetector::new(
        Arc::new(RealFileSystem),
        settings.watch_roots(),
        settings.matcher.clone(),
    );
    for root in detector.roots() {
        let mut files = detector.list_matching(root);
        files.sort();
        println!("{:?} {} ({} files):", root.kind, root.path.display(), files.len());
        for file in files {
            println!("  - {}", file.display());
        }
    }

    debug!("dry-run complete (no execution)");
}
