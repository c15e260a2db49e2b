// src/fs/mock.rs

//! In-memory [`FileSystem`] used by tests to drive the change detector
//! through edit sequences without touching disk.

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    /// A file that is listed but cannot be opened (permission denied).
    Unreadable,
    Dir(Vec<String>), // List of child names
    /// A directory that exists but cannot be listed.
    SealedDir,
    /// A symbolic link to another path in the mock tree.
    Symlink(PathBuf),
}

/// Link hops followed before a path is treated as dangling.
const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
        }
    }

    /// Create or overwrite a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), MockEntry::File(content.into()));
    }

    pub fn add_unreadable_file(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Unreadable);
    }

    pub fn add_sealed_dir(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::SealedDir);
    }

    /// Create a symbolic link at `path` pointing to `target`. The target does
    /// not need to exist.
    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl Into<PathBuf>) {
        self.insert(path.as_ref(), MockEntry::Symlink(target.into()));
    }

    /// Remove a file from the tree (its parent keeps no reference to it).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        files.remove(path);
        if let (Some(parent), Some(name)) = (path.parent(), file_name(path)) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                children.retain(|c| c != &name);
            }
        }
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), entry);

        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(&mut files, parent);
            Self::link_child(&mut files, parent, path);
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(files, parent);
            Self::link_child(files, parent, path);
        }
    }

    fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let (Some(MockEntry::Dir(children)), Some(name)) =
            (files.get_mut(parent), file_name(child))
        {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }
}

/// Look up `path`, following symlinks like `stat` does.
fn resolve<'a>(files: &'a HashMap<PathBuf, MockEntry>, path: &Path) -> Option<&'a MockEntry> {
    let mut entry = files.get(path)?;
    for _ in 0..MAX_LINK_HOPS {
        match entry {
            MockEntry::Symlink(target) => entry = files.get(target)?,
            other => return Some(other),
        }
    }
    None
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let files = self.files.lock().unwrap();
        match resolve(&files, path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Unreadable) => Err(anyhow!("Permission denied: {:?}", path)),
            Some(MockEntry::Dir(_)) | Some(MockEntry::SealedDir) => {
                Err(anyhow!("Is a directory: {:?}", path))
            }
            Some(MockEntry::Symlink(_)) | None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(
            resolve(&files, path),
            Some(MockEntry::File(_)) | Some(MockEntry::Unreadable)
        )
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(
            resolve(&files, path),
            Some(MockEntry::Dir(_)) | Some(MockEntry::SealedDir)
        )
    }

    fn is_symlink(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        matches!(files.get(path), Some(MockEntry::Symlink(_)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        // In mock, we just return the path as is, assuming absolute paths are used in tests
        if self.files.lock().unwrap().contains_key(path) {
            Ok(path.to_path_buf())
        } else {
            Err(anyhow!("File not found: {:?}", path))
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        match resolve(&files, path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::SealedDir) => Err(anyhow!("Permission denied: {:?}", path)),
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
