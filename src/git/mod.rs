//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! The generator talks to git only through the [`VcsEngine`] trait. The
//! production engine, [`GitEngine`], is the **only** place `git2` is
//! imported; [`MemoryEngine`] is a dependency-free stand-in for tests.
//!
//! # Responsibilities
//!
//! - Repository initialization (scratch or at a chosen path)
//! - Working tree writes, staging, commits
//! - Ref creation and enumeration
//! - Remote registration and refspec-driven push
//!
//! # Example
//!
//! ```ignore
//! use git_brancher::git::{Author, GitEngine, VcsEngine};
//!
//! let mut git = GitEngine::scratch()?;
//! git.write_file("master", b"master")?;
//! git.add("master")?;
//! let oid = git.commit("master", &Author::new("x", "x"))?;
//! git.set_reference(&"refs/heads/master".to_string().try_into()?, &oid)?;
//! ```

mod engine;
mod interface;
mod memory;
mod refspec;

pub use engine::{validate_worktree_path, Author, GitError, RemoteSpec, VcsEngine};
pub use interface::{CommitInfo, GitEngine, RefEntry};
pub use memory::{MemoryCommit, MemoryEngine, MemoryRemote};
pub use refspec::Refspec;
