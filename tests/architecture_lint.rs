//! Architecture enforcement tests.
//!
//! `git2` is reachable only through `src/git/interface.rs`, and the
//! generator depends on the `VcsEngine` trait rather than a concrete engine.
//! These tests catch violations in CI.

use std::fs;
use std::path::{Path, PathBuf};

/// Collect every `.rs` file under `dir`.
fn rust_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).expect("failed to read source dir") {
        let path = entry.expect("bad dir entry").path();
        if path.is_dir() {
            files.extend(rust_files(&path));
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[test]
fn git2_only_in_interface() {
    let allowed = src_dir().join("git/interface.rs");
    let offenders: Vec<PathBuf> = rust_files(&src_dir())
        .into_iter()
        .filter(|path| *path != allowed)
        .filter(|path| {
            let contents = fs::read_to_string(path).expect("failed to read source file");
            contents.contains("git2::")
        })
        .collect();

    assert!(
        offenders.is_empty(),
        "git2 used outside git/interface.rs: {:?}",
        offenders
    );
}

#[test]
fn generator_is_engine_agnostic() {
    for path in rust_files(&src_dir().join("generator")) {
        let contents = fs::read_to_string(&path).expect("failed to read source file");
        let non_test = contents.split("#[cfg(test)]").next().unwrap_or("");
        assert!(
            !non_test.contains("GitEngine") && !non_test.contains("MemoryEngine"),
            "{} names a concrete engine outside tests",
            path.display()
        );
    }
}
