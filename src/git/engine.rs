//! git::engine
//!
//! The narrow contract the branch generator needs from a version-control
//! engine, plus the error and value types shared by every implementation.
//!
//! # Contract
//!
//! An engine owns one repository and one working tree. Operations are
//! strictly sequential and each depends on the state the previous one left:
//!
//! - [`VcsEngine::checkout`] resets the staging area to a commit's tree,
//!   discards unstaged writes and makes that commit the parent of the next
//!   commit
//! - [`VcsEngine::write_file`] creates or replaces a file in the working tree
//! - [`VcsEngine::add`] stages a previously written path
//! - [`VcsEngine::commit`] snapshots the staging area on top of the current
//!   commit and moves the current commit forward
//! - [`VcsEngine::set_reference`] points a ref at a commit (create or update)
//! - [`VcsEngine::create_remote`] registers a named remote
//! - [`VcsEngine::push`] transfers refs selected by refspecs to a remote
//!
//! Repository initialization is each implementation's constructor.

use std::path::PathBuf;

use thiserror::Error;

use super::Refspec;
use crate::core::types::{Oid, RefName, TypeError};

/// Errors from engine operations.
///
/// The categorization lets the generator attach phase context without
/// string matching.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path does not hold a Git repository.
    #[error("not a git repository: {}", .path.display())]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Refusing to initialize over an existing repository.
    #[error("repository already exists at {}", .path.display())]
    AlreadyExists {
        /// The occupied path
        path: PathBuf,
    },

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Malformed refspec.
    #[error("invalid refspec '{spec}': {message}")]
    InvalidRefspec {
        /// The refspec text
        spec: String,
        /// Description of the problem
        message: String,
    },

    /// Working tree path is unusable (empty, absolute, or escaping the tree).
    #[error("invalid working tree path: {path}")]
    InvalidPath {
        /// The rejected path
        path: String,
    },

    /// Staging a path that was never written to the working tree.
    #[error("path not in working tree: {path}")]
    PathNotFound {
        /// The missing path
        path: String,
    },

    /// Remote name is not registered.
    #[error("remote not found: {name}")]
    RemoteNotFound {
        /// The remote name
        name: String,
    },

    /// Remote name is already registered.
    #[error("remote already exists: {name}")]
    RemoteExists {
        /// The remote name
        name: String,
    },

    /// The remote refused to update a ref.
    #[error("push of {refname} rejected: {message}")]
    PushRejected {
        /// The destination ref
        refname: String,
        /// The remote's reason
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal engine error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::InvalidRefName { message: msg },
            TypeError::InvalidBranchName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// Commit author and committer identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

impl Author {
    /// Create an identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// A remote to register before pushing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    /// Remote name (e.g. "origin")
    pub name: String,
    /// Push/fetch URL
    pub url: String,
    /// Fetch refspec stored in the remote's configuration
    pub fetch: Refspec,
}

/// Check a working tree path: relative, non-empty, no `.`/`..` components.
pub fn validate_worktree_path(path: &str) -> Result<(), GitError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.contains('\0')
        || path
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == ".." || part == ".git");
    if invalid {
        return Err(GitError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// Operations the branch generator drives.
///
/// Implemented by [`super::GitEngine`] (libgit2) and
/// [`super::MemoryEngine`] (pure in-memory test double).
pub trait VcsEngine {
    /// Reset the staging area to `commit`'s tree and make it the parent of
    /// the next commit.
    fn checkout(&mut self, commit: &Oid) -> Result<(), GitError>;

    /// Create or replace `path` in the working tree.
    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<(), GitError>;

    /// Stage `path` from the working tree.
    fn add(&mut self, path: &str) -> Result<(), GitError>;

    /// Commit the staging area and return the new commit id.
    fn commit(&mut self, message: &str, author: &Author) -> Result<Oid, GitError>;

    /// Create or overwrite `name` to point at `target`.
    fn set_reference(&mut self, name: &RefName, target: &Oid) -> Result<(), GitError>;

    /// Register a remote.
    fn create_remote(&mut self, remote: &RemoteSpec) -> Result<(), GitError>;

    /// Push local refs matched by `refspecs` to the named remote.
    fn push(&mut self, remote: &str, refspecs: &[Refspec]) -> Result<(), GitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worktree_paths() {
        for ok in ["master", "pr-open-0", "dir/file.txt", "a.b"] {
            assert!(validate_worktree_path(ok).is_ok(), "rejected {:?}", ok);
        }
        for bad in ["", "/abs", "a//b", "./a", "../up", "a/..", ".git", "a\\b", "dir/"] {
            assert!(
                matches!(validate_worktree_path(bad), Err(GitError::InvalidPath { .. })),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn type_errors_convert() {
        let err: GitError = TypeError::InvalidOid("short".into()).into();
        assert!(matches!(err, GitError::InvalidOid { .. }));

        let err: GitError = TypeError::InvalidBranchName("bad".into()).into();
        assert!(matches!(err, GitError::InvalidRefName { .. }));
    }

    #[test]
    fn error_display_formatting() {
        let err = GitError::PushRejected {
            refname: "refs/heads/master".to_string(),
            message: "non-fast-forward".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "push of refs/heads/master rejected: non-fast-forward"
        );
    }

    #[test]
    fn author_display() {
        assert_eq!(Author::new("x", "x").to_string(), "x <x>");
    }
}
