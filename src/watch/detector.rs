// src/watch/detector.rs

//! Content-based change detection over one or more watch roots.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::types::RootKind;
use crate::watch::hash::compute_file_hash;
use crate::watch::patterns::{collect_matching_files, FileMatcher};
use crate::watch::snapshot::Snapshot;

/// A directory tree scanned on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub path: PathBuf,
    pub kind: RootKind,
}

impl WatchRoot {
    pub fn primary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: RootKind::Primary,
        }
    }

    pub fn auxiliary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: RootKind::Auxiliary,
        }
    }
}

/// Result of scanning a single root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootScan {
    pub root: PathBuf,
    pub kind: RootKind,
    pub changed: bool,
    /// Files matched and successfully hashed.
    pub scanned: usize,
    /// Files that were new or whose digest differed.
    pub changed_files: usize,
}

/// Per-root outcome of one scan, in root order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub roots: Vec<RootScan>,
}

impl ScanReport {
    pub fn any_changed(&self) -> bool {
        self.roots.iter().any(|r| r.changed)
    }

    pub fn changed_roots(&self) -> impl Iterator<Item = &Path> {
        self.roots
            .iter()
            .filter(|r| r.changed)
            .map(|r| r.root.as_path())
    }

    pub fn changed_for(&self, root: &Path) -> Option<bool> {
        self.roots.iter().find(|r| r.root == root).map(|r| r.changed)
    }
}

/// Scans the configured roots and compares file digests against the shared
/// [`Snapshot`].
#[derive(Debug)]
pub struct ChangeDetector {
    fs: Arc<dyn FileSystem>,
    roots: Vec<WatchRoot>,
    matcher: FileMatcher,
    snapshot: Snapshot,
}

impl ChangeDetector {
    pub fn new(fs: Arc<dyn FileSystem>, roots: Vec<WatchRoot>, matcher: FileMatcher) -> Self {
        Self {
            fs,
            roots,
            matcher,
            snapshot: Snapshot::new(),
        }
    }

    pub fn roots(&self) -> &[WatchRoot] {
        &self.roots
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Scan every root and update the snapshot.
    ///
    /// All roots are always scanned in full, so the snapshot stays current
    /// even when an earlier root already reported a change.
    pub fn scan(&mut self) -> ScanReport {
        let initial = self.snapshot.is_empty();
        let mut report = ScanReport::default();
        for root in &self.roots {
            let scan = scan_root(self.fs.as_ref(), root, &self.matcher, &mut self.snapshot);
            if scan.changed {
                debug!(
                    root = ?scan.root,
                    changed_files = scan.changed_files,
                    scanned = scan.scanned,
                    "watch root changed"
                );
            }
            report.roots.push(scan);
        }
        if initial && !self.snapshot.is_empty() {
            info!(files = self.snapshot.len(), "initial scan complete");
        }
        report
    }

    /// List the files currently matched in `root`, without hashing them.
    pub fn list_matching(&self, root: &WatchRoot) -> Vec<PathBuf> {
        collect_matching_files(self.fs.as_ref(), &root.path, &self.matcher)
    }
}

fn scan_root(
    fs: &dyn FileSystem,
    root: &WatchRoot,
    matcher: &FileMatcher,
    snapshot: &mut Snapshot,
) -> RootScan {
    let mut scanned = 0;
    let mut changed_files = 0;

    for path in collect_matching_files(fs, &root.path, matcher) {
        let digest = match compute_file_hash(fs, &path) {
            Ok(d) => d,
            Err(err) => {
                warn!(file = ?path, error = %err, "skipping file that could not be hashed");
                continue;
            }
        };
        scanned += 1;
        if snapshot.observe(&path, digest) {
            changed_files += 1;
        }
    }

    RootScan {
        root: root.path.clone(),
        kind: root.kind,
        changed: changed_files > 0,
        scanned,
        changed_files,
    }
}
