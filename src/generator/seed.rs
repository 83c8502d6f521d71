//! generator::seed
//!
//! Files imported verbatim into the master branch.

use std::ffi::OsStr;
use std::path::Path;

use super::GenerateError;
use crate::git::validate_worktree_path;

/// A file to commit on master, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFile {
    /// Base name the file is stored under in the repository
    pub name: String,
    /// Exact bytes of the source file
    pub contents: Vec<u8>,
}

impl SeedFile {
    /// Build a seed from a name and contents.
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }

    /// Read `path` and keep only its base name.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::InvalidSeedPath`] if the path has no UTF-8 file
    ///   name usable inside a repository
    /// - [`GenerateError::SeedFile`] if the file cannot be read
    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let name = path
            .file_name()
            .and_then(OsStr::to_str)
            .filter(|name| validate_worktree_path(name).is_ok())
            .ok_or_else(|| GenerateError::InvalidSeedPath {
                path: path.to_path_buf(),
            })?;

        let contents = std::fs::read(path).map_err(|source| GenerateError::SeedFile {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(name, contents))
    }

    /// Load every path in order. A later file with the same base name
    /// replaces an earlier one.
    pub fn load_all<I, P>(paths: I) -> Result<Vec<Self>, GenerateError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut seeds: Vec<Self> = Vec::new();
        for path in paths {
            let seed = Self::load(path.as_ref())?;
            seeds.retain(|existing| existing.name != seed.name);
            seeds.push(seed);
        }
        Ok(seeds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_uses_base_name() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("deep/dir");
        std::fs::create_dir_all(&nested).unwrap();
        let path = nested.join("payload.bin");
        std::fs::write(&path, [1u8, 2, 3, 255]).unwrap();

        let seed = SeedFile::load(&path).unwrap();
        assert_eq!(seed.name, "payload.bin");
        assert_eq!(seed.contents, vec![1, 2, 3, 255]);
    }

    #[test]
    fn missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let err = SeedFile::load(&temp.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, GenerateError::SeedFile { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[test]
    fn path_without_file_name_rejected() {
        assert!(matches!(
            SeedFile::load(Path::new("..")),
            Err(GenerateError::InvalidSeedPath { .. })
        ));
        assert!(matches!(
            SeedFile::load(Path::new("/")),
            Err(GenerateError::InvalidSeedPath { .. })
        ));
    }

    #[test]
    fn later_duplicate_wins() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("same.txt"), "first").unwrap();
        std::fs::write(b.join("same.txt"), "second").unwrap();
        std::fs::write(a.join("other.txt"), "other").unwrap();

        let seeds = SeedFile::load_all([
            a.join("same.txt"),
            a.join("other.txt"),
            b.join("same.txt"),
        ])
        .unwrap();

        let names: Vec<&str> = seeds.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["other.txt", "same.txt"]);
        assert_eq!(seeds[1].contents, b"second");
    }
}
