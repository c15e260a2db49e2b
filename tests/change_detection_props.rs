use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;
use watchbuild::fs::mock::MockFileSystem;
use watchbuild::watch::{ChangeDetector, FileMatcher, WatchRoot};

const FILES: [&str; 4] = [
    "/app/main.go",
    "/app/pkg/util.go",
    "/app/pkg/deep/x.go",
    "/app/notes.txt",
];

#[derive(Debug, Clone)]
enum Step {
    /// Write `contents` to `FILES[file]`.
    Write { file: usize, contents: u8 },
    /// Scan with no intervening edit.
    Scan,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..FILES.len(), 0u8..4).prop_map(|(file, contents)| Step::Write { file, contents }),
        1 => Just(Step::Scan),
    ]
}

fn detector(fs: &MockFileSystem) -> ChangeDetector {
    let matcher = FileMatcher::new(r".*\.go$", &[]).unwrap();
    ChangeDetector::new(Arc::new(fs.clone()), vec![WatchRoot::primary("/app")], matcher)
}

fn fs_has(fs: &MockFileSystem, path: &str) -> bool {
    use watchbuild::fs::FileSystem;
    fs.is_file(Path::new(path))
}

fn is_watched(path: &str) -> bool {
    path.ends_with(".go")
}

proptest! {
    /// A scan reports "changed" iff some matched file is new or its contents
    /// differ from what the previous scan saw.
    #[test]
    fn scan_reports_change_iff_a_matched_digest_differs(
        steps in proptest::collection::vec(step_strategy(), 1..40)
    ) {
        let fs = MockFileSystem::new();
        let mut det = detector(&fs);

        // Model: contents as of the last scan, and the current contents.
        let mut seen: HashMap<&str, u8> = HashMap::new();
        let mut current: HashMap<&str, u8> = HashMap::new();

        for step in steps {
            match step {
                Step::Write { file, contents } => {
                    let path = FILES[file];
                    fs.add_file(path, vec![contents; 3]);
                    current.insert(path, contents);
                }
                Step::Scan => {
                    let expected = current
                        .iter()
                        .filter(|(path, _)| is_watched(path))
                        .any(|(path, contents)| seen.get(*path) != Some(contents));

                    prop_assert_eq!(det.scan().any_changed(), expected);
                    seen.extend(current.iter().map(|(p, c)| (*p, *c)));
                }
            }
        }
    }

    /// Two consecutive scans without modification never both report a change.
    #[test]
    fn back_to_back_scans_are_idempotent(
        writes in proptest::collection::vec((0..FILES.len(), any::<u8>()), 0..20)
    ) {
        let fs = MockFileSystem::new();
        let mut det = detector(&fs);
        for (file, contents) in writes {
            fs.add_file(FILES[file], vec![contents]);
        }

        let first = det.scan();
        let second = det.scan();
        prop_assert!(!(first.any_changed() && second.any_changed()));
        prop_assert!(!second.any_changed());

        for path in FILES.iter().filter(|p| is_watched(p)) {
            let written = fs_has(&fs, path);
            prop_assert_eq!(det.snapshot().get(Path::new(path)).is_some(), written);
        }
    }
}
