// src/watch/mod.rs

//! Polling change detection.
//!
//! This module is responsible for:
//! - Compiling the file-name pattern and exclude globs once (`patterns`).
//! - Hashing file contents (`hash`).
//! - Remembering the last digest per path (`snapshot`).
//! - Scanning the watch roots on every tick and reporting which of them
//!   changed (`detector`).
//!
//! It knows nothing about builds or processes; it only answers "did any
//! watched content change since the previous scan?".

pub mod detector;
pub mod hash;
pub mod patterns;
pub mod snapshot;

pub use detector::{ChangeDetector, RootScan, ScanReport, WatchRoot};
pub use hash::{compute_file_hash, Digest};
pub use patterns::{collect_matching_files, FileMatcher};
pub use snapshot::Snapshot;
