// src/watch/patterns.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use tracing::{trace, warn};

use crate::errors::Result;
use crate::fs::FileSystem;

/// Compiled file selection rules shared by every watch root.
///
/// - `pattern` is a regular expression matched (case-sensitive, unanchored)
///   against the file *name* only, e.g. `.*\.go$`.
/// - `exclude` globs are matched against the path relative to the watch
///   root. A glob matching a directory prunes the whole subtree.
///
/// Compiled once at start-up and reused for every scan.
#[derive(Clone)]
pub struct FileMatcher {
    pattern: Regex,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for FileMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileMatcher")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

impl FileMatcher {
    pub fn new(pattern: &str, exclude: &[String]) -> Result<Self> {
        let pattern = Regex::new(pattern)?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };
        Ok(Self {
            pattern,
            exclude_set,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns true if the file name (not the path) matches the pattern.
    pub fn matches_name(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }

    /// Returns true if a path relative to the watch root is excluded.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.exclude_set
            .as_ref()
            .is_some_and(|set| set.is_match(rel_path))
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(builder.build()?)
}

/// Collect all files under `root` whose names match `matcher`.
///
/// Best effort: a directory that cannot be listed is skipped with a warning
/// and the walk continues with its siblings. Symlinked directories are never
/// entered; a symlinked file is read through its link.
pub fn collect_matching_files(
    fs: &dyn FileSystem,
    root: &Path,
    matcher: &FileMatcher,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = ?dir, error = %err, "skipping unreadable directory");
                continue;
            }
        };

        for path in entries {
            if matcher.is_excluded(&relative_str(root, &path)) {
                trace!(path = ?path, "excluded");
                continue;
            }
            if fs.is_dir(&path) {
                // A linked directory may point back up the tree.
                if fs.is_symlink(&path) {
                    trace!(path = ?path, "not following directory symlink");
                    continue;
                }
                stack.push(path);
            } else if fs.is_file(&path) {
                let name_matches = path
                    .file_name()
                    .map(|n| matcher.matches_name(&n.to_string_lossy()))
                    .unwrap_or(false);
                if name_matches {
                    files.push(path);
                }
            }
        }
    }

    files
}

/// Path relative to `root` with forward slashes, as globs expect.
fn relative_str(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn sorted(mut files: Vec<PathBuf>) -> Vec<String> {
        files.sort();
        files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn name_pattern_is_case_sensitive_and_unanchored() {
        let m = FileMatcher::new(r"\.go$", &[]).unwrap();
        assert!(m.matches_name("main.go"));
        assert!(!m.matches_name("MAIN.GO"));
        assert!(!m.matches_name("main.go.bak"));

        let m = FileMatcher::new("handler", &[]).unwrap();
        assert!(m.matches_name("http_handler_test.go"));
    }

    #[test]
    fn pattern_is_applied_to_file_name_not_directory() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/src.go/readme.txt", b"x");
        fs.add_file("/w/pkg/util.go", b"y");

        let m = FileMatcher::new(r".*\.go$", &[]).unwrap();
        let files = collect_matching_files(&fs, Path::new("/w"), &m);
        assert_eq!(sorted(files), vec!["/w/pkg/util.go"]);
    }

    #[test]
    fn exclude_prunes_directories_and_files() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/main.go", b"package main");
        fs.add_file("/w/vendor/dep/dep.go", b"package dep");
        fs.add_file("/w/gen_test.go", b"package main");

        let exclude = vec!["vendor".to_string(), "*_test.go".to_string()];
        let m = FileMatcher::new(r".*\.go$", &exclude).unwrap();
        let files = collect_matching_files(&fs, Path::new("/w"), &m);
        assert_eq!(sorted(files), vec!["/w/main.go"]);
    }

    #[test]
    fn unreadable_directory_is_skipped() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/a.go", b"a");
        fs.add_sealed_dir("/w/locked");

        let m = FileMatcher::new(r".*\.go$", &[]).unwrap();
        let files = collect_matching_files(&fs, Path::new("/w"), &m);
        assert_eq!(sorted(files), vec!["/w/a.go"]);
    }

    #[test]
    fn symlinked_directories_are_not_entered() {
        let fs = MockFileSystem::new();
        fs.add_file("/w/main.go", b"package main");
        fs.add_file("/shared/lib.go", b"package shared");
        fs.add_symlink("/w/loop_a", "/w");
        fs.add_symlink("/w/loop_b", "/w");
        fs.add_symlink("/w/shared", "/shared");

        let m = FileMatcher::new(r".*\.go$", &[]).unwrap();
        let files = collect_matching_files(&fs, Path::new("/w"), &m);
        assert_eq!(sorted(files), vec!["/w/main.go"]);
    }

    #[test]
    fn symlinked_file_is_matched_by_its_link_name() {
        let fs = MockFileSystem::new();
        fs.add_file("/elsewhere/real.go", b"package x");
        fs.add_symlink("/w/link.go", "/elsewhere/real.go");
        fs.add_symlink("/w/dangling.go", "/nowhere.go");

        let m = FileMatcher::new(r".*\.go$", &[]).unwrap();
        let files = collect_matching_files(&fs, Path::new("/w"), &m);
        assert_eq!(sorted(files), vec!["/w/link.go"]);
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(FileMatcher::new("(unclosed", &[]).is_err());
    }
}
