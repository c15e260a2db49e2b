// src/watch/snapshot.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::watch::hash::Digest;

/// Last observed digest for every watched file.
///
/// One store is shared by all watch roots. Entries are only ever inserted or
/// overwritten: a file that disappears keeps its last digest, so recreating it
/// with identical contents is not reported as a change.
#[derive(Debug, Default)]
pub struct Snapshot {
    digests: HashMap<PathBuf, Digest>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self {
            digests: HashMap::new(),
        }
    }

    /// Record `digest` for `path`, returning true if the path was unseen or
    /// its digest differs from the stored one.
    pub fn observe(&mut self, path: &Path, digest: Digest) -> bool {
        match self.digests.get_mut(path) {
            Some(stored) if *stored == digest => false,
            Some(stored) => {
                trace!(path = ?path, "digest changed");
                *stored = digest;
                true
            }
            None => {
                trace!(path = ?path, "new file");
                self.digests.insert(path.to_path_buf(), digest);
                true
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<&Digest> {
        self.digests.get(path)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}
