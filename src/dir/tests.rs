#![cfg(test)]

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serial_test::serial;
use tempfile::TempDir;

use super::*;
use crate::FileType;
use crate::error::ErrorKind;
use crate::util::leak::assert_no_leak;

/// `a.txt`, `b.txt`, `c.txt -> a.txt` (where symlinks can be created) and `sub/d.txt`.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("a scratch directory should be creatable");
    fs::write(dir.path().join("a.txt"), "a").expect("a.txt should be writable");
    fs::write(dir.path().join("b.txt"), "b").expect("b.txt should be writable");
    #[cfg(unix)]
    std::os::unix::fs::symlink("a.txt", dir.path().join("c.txt"))
        .expect("c.txt should be linkable");
    fs::create_dir(dir.path().join("sub")).expect("sub should be creatable");
    fs::write(dir.path().join("sub").join("d.txt"), "d").expect("sub/d.txt should be writable");
    dir
}

/// The entry's path below `root`, with `/` separators.
fn relative(root: &Path, entry: &DirEntry) -> String {
    let root = root.to_string_lossy().into_owned();
    let path = entry.path().to_string_lossy().into_owned();
    path.strip_prefix(&root)
        .expect("every entry should be below the root")
        .trim_start_matches(['/', '\\'])
        .replace('\\', "/")
}

fn collect(root: &Path, entries: DirEntries<'_>) -> Vec<(String, FileType)> {
    entries
        .map(|entry| {
            let entry = entry.expect("Every entry should be readable.");
            (relative(root, &entry), entry.file_type())
        })
        .collect()
}

fn names(listing: &[(String, FileType)]) -> BTreeSet<&str> {
    listing.iter().map(|(name, _)| name.as_str()).collect()
}

fn expected(names: &[&'static str]) -> BTreeSet<&'static str> {
    let mut expected: BTreeSet<_> = names.iter().copied().collect();
    if cfg!(unix) {
        expected.insert("c.txt");
    }
    expected
}

#[test]
#[serial]
fn test_direct_traversal() {
    let dir = fixture();

    let listing = assert_no_leak!({
        let directory = Directory::open(dir.path()).expect("Opening should succeed.");
        let listing = collect(dir.path(), directory.entries(false));
        directory.close().expect("Closing should succeed.");
        listing
    });

    assert_eq!(
        names(&listing),
        expected(&["a.txt", "b.txt", "sub", ".", ".."]),
        "A direct traversal should list exactly the children, dot entries included."
    );
    assert_eq!(listing.len(), names(&listing).len(), "No entry should be listed twice.");

    for (name, file_type) in &listing {
        let expected_type = match name.as_str() {
            "a.txt" | "b.txt" => FileType::Regular,
            "c.txt" => FileType::Symlink,
            _ => FileType::Directory,
        };
        assert_eq!(*file_type, expected_type, "{name} should be a {expected_type}.");
    }
}

#[test]
#[serial]
fn test_recursive_traversal() {
    let dir = fixture();

    let listing = assert_no_leak!({ collect(dir.path(), walk(dir.path(), true)) });

    assert_eq!(
        names(&listing),
        expected(&["a.txt", "b.txt", "sub", ".", "..", "sub/d.txt", "sub/.", "sub/.."]),
        "A recursive traversal should add the subdirectory's entries."
    );
    assert_eq!(listing.len(), names(&listing).len(), "No entry should be listed twice.");

    let position = |target: &str| {
        listing
            .iter()
            .position(|(name, _)| name == target)
            .expect("the entry should be listed")
    };
    let sub = position("sub");
    let mut children: Vec<_> = ["sub/d.txt", "sub/.", "sub/.."].into_iter().map(position).collect();
    children.sort_unstable();
    assert_eq!(
        children,
        vec![sub + 1, sub + 2, sub + 3],
        "A subdirectory's entries should directly follow it."
    );
}

#[test]
#[serial]
fn test_symlinks_are_not_followed() {
    let dir = fixture();
    #[cfg(unix)]
    std::os::unix::fs::symlink("sub", dir.path().join("link")).expect("link should be creatable");

    let listing = collect(dir.path(), walk(dir.path(), true));
    assert!(
        !listing.iter().any(|(name, _)| name.starts_with("link/")),
        "A symlink to a directory shouldn't be descended into."
    );
}

#[test]
#[serial]
fn test_deep_traversal() {
    let dir = tempfile::tempdir().expect("a scratch directory should be creatable");
    fs::create_dir_all(dir.path().join("a/b/c/d")).expect("the tree should be creatable");
    fs::write(dir.path().join("a/b/c/d/leaf"), "").expect("the leaf should be writable");
    fs::write(dir.path().join("a/top"), "").expect("the top file should be writable");

    let listing = assert_no_leak!({ collect(dir.path(), walk(dir.path(), true)) });
    let files: BTreeSet<_> = listing
        .iter()
        .filter(|(_, file_type)| *file_type == FileType::Regular)
        .map(|(name, _)| name.as_str())
        .collect();

    assert_eq!(files, BTreeSet::from(["a/b/c/d/leaf", "a/top"]));
    assert_eq!(
        listing.iter().filter(|(name, _)| name.ends_with("..")).count(),
        5,
        "Every level should report its own parent entry."
    );
}

#[test]
#[serial]
fn test_exhaustion_is_idempotent() {
    let dir = fixture();

    assert_no_leak!({
        let directory = Directory::open(dir.path()).expect("Opening should succeed.");
        let mut entries = directory.entries(true);
        for entry in entries.by_ref() {
            entry.expect("Every entry should be readable.");
        }
        assert!(entries.is_exhausted());

        for _ in 0..3 {
            assert!(entries.next().is_none(), "An exhausted traversal should stay exhausted.");
        }
        drop(entries);
        directory.close().expect("Closing should succeed.");
    }, "An exhausted traversal should hold no native resources.");
}

#[test]
#[serial]
fn test_open_error_is_yielded_once() {
    let dir = fixture();

    assert_no_leak!({
        let mut entries = walk(dir.path().join("a.txt"), false);
        let error = entries
            .next()
            .expect("The failure should be yielded.")
            .expect_err("Walking a file should fail.");
        assert_eq!(error.kind(), Some(ErrorKind::NotADirectory));
        assert!(entries.next().is_none(), "The failure should only be yielded once.");
        assert!(entries.next().is_none());

        let missing = walk(dir.path().join("missing"), true).collect::<Result<Vec<_>, _>>();
        let error = missing.expect_err("Walking a missing path should fail.");
        assert_eq!(error.kind(), Some(ErrorKind::NotFound));
    });
}

#[test]
#[serial]
fn test_early_termination_releases_streams() {
    let dir = fixture();

    assert_no_leak!({
        let mut entries = walk(dir.path(), true);
        // Deep enough to be inside sub on at least one ordering.
        for _ in 0..7 {
            entries.next();
        }
        drop(entries);
    }, "Dropping a traversal part way should close its streams.");
}

#[test]
#[serial]
fn test_entries_can_be_listed_twice() {
    let dir = fixture();

    with_directory(dir.path(), |directory| {
        let first = directory.direct_entries()?;
        let second = directory.direct_entries()?;
        assert_eq!(first.len(), second.len(), "Each listing should start from the beginning.");
        assert_eq!(
            directory.metadata()?.file_type,
            FileType::Directory
        );
        Ok(())
    })
    .expect("Listing should succeed.");
}

#[test]
#[serial]
fn test_entry_names() {
    let dir = fixture();

    let entries = walk(dir.path(), false)
        .collect::<Result<Vec<_>, _>>()
        .expect("Listing should succeed.");
    let dots: Vec<_> = entries.iter().filter(|entry| entry.is_dot()).collect();

    assert_eq!(dots.len(), 2);
    assert!(dots.iter().any(|entry| entry.name() == ".."), "`..` should keep its name.");
    assert!(
        entries.iter().any(|entry| entry.name() == "sub" && entry.path().ends_with("sub")),
        "The name should be the last path component."
    );
}

#[test]
#[serial]
fn test_interleaved_listings() {
    let dir = tempfile::tempdir().expect("a scratch directory should be creatable");
    // Enough entries that a listing takes several native reads.
    for i in 0..2000 {
        fs::write(dir.path().join(format!("file-{i:04}")), "")
            .expect("the file should be writable");
    }

    let (first, second) = assert_no_leak!({
        let directory = Directory::open(dir.path()).expect("Opening should succeed.");
        let mut first = directory.entries(false);
        let mut seen: Vec<_> = first.by_ref().take(10).collect();

        let second = collect(dir.path(), directory.entries(false));
        seen.extend(first);
        directory.close().expect("Closing should succeed.");

        let first: Vec<_> = seen
            .into_iter()
            .map(|entry| relative(dir.path(), &entry.expect("Every entry should be readable.")))
            .collect();
        (first, second)
    });

    let first_names: BTreeSet<_> = first.iter().map(String::as_str).collect();
    assert_eq!(first.len(), 2002, "The first listing shouldn't lose entries to the second.");
    assert_eq!(first_names.len(), first.len(), "No entry should be listed twice.");
    assert_eq!(first_names, names(&second), "Both listings should see the same entries.");
}

#[cfg(unix)]
#[test]
#[serial]
fn test_directory_removed_mid_walk() {
    let dir = fixture();

    let results = assert_no_leak!({
        let mut entries = walk(dir.path(), true);
        let mut results = Vec::new();
        for result in entries.by_ref() {
            let is_sub = matches!(&result, Ok(entry) if entry.name() == "sub");
            results.push(result);
            if is_sub {
                fs::remove_dir_all(dir.path().join("sub")).expect("sub should be removable");
                break;
            }
        }
        results.extend(entries.by_ref());
        assert!(entries.next().is_none(), "The walk should end after the failure.");
        results
    }, "A failed walk should close every stream it opened.");

    let error = results
        .last()
        .expect("something should be yielded")
        .as_ref()
        .expect_err("The walk should end with the failure.");
    assert_eq!(error.kind(), Some(ErrorKind::NotFound));
    assert!(
        error.operation.as_str().contains("sub"),
        "The error should name the directory, got {error}."
    );
    assert_eq!(
        results.iter().filter(|result| result.is_err()).count(),
        1,
        "The failure should be yielded exactly once."
    );
}

#[cfg(unix)]
#[test]
#[serial]
fn test_unreadable_subdirectory() {
    use std::os::unix::fs::PermissionsExt;

    // Permission checks don't apply to root.
    // SAFETY: geteuid has no preconditions.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let dir = fixture();
    let locked = dir.path().join("sub");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))
        .expect("sub should be lockable");

    let results: Vec<_> = assert_no_leak!({ walk(dir.path(), true).collect::<Vec<_>>() });
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))
        .expect("sub should be unlockable");

    let error = results
        .last()
        .expect("something should be yielded")
        .as_ref()
        .expect_err("The walk should end with the failure.");
    assert_eq!(error.kind(), Some(ErrorKind::PermissionDenied));
    assert_eq!(
        results.iter().filter(|result| result.is_err()).count(),
        1,
        "The failure should be yielded exactly once."
    );
}
