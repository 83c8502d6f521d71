//! git::memory
//!
//! A pure in-memory [`VcsEngine`] used as a test double for the generator.
//!
//! Commit ids are sequential 40-digit hex numbers, so runs are fully
//! deterministic. Pushes copy refs into an in-memory remote and honor
//! fast-forward rules. Failures can be injected to exercise error paths.

use std::collections::BTreeMap;

use super::engine::validate_worktree_path;
use super::{Author, GitError, Refspec, RemoteSpec, VcsEngine};
use crate::core::types::{Oid, RefName};

/// A commit recorded by [`MemoryEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryCommit {
    /// Commit id
    pub oid: Oid,
    /// Parent commit, `None` for the root
    pub parent: Option<Oid>,
    /// Commit message
    pub message: String,
    /// Author and committer
    pub author: Author,
    /// Full tree snapshot
    pub files: BTreeMap<String, Vec<u8>>,
}

/// A registered remote and the refs pushed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRemote {
    /// Remote URL
    pub url: String,
    /// Fetch refspec
    pub fetch: Refspec,
    /// Refs as the remote sees them
    pub refs: BTreeMap<RefName, Oid>,
}

/// In-memory engine.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    commits: BTreeMap<Oid, MemoryCommit>,
    refs: BTreeMap<RefName, Oid>,
    staged: BTreeMap<String, Vec<u8>>,
    worktree: BTreeMap<String, Vec<u8>>,
    head: Option<Oid>,
    remotes: BTreeMap<String, MemoryRemote>,
    fail_commit_at: Option<usize>,
    fail_checkout_at: Option<usize>,
    fail_create_remote: bool,
    checkouts: usize,
}

impl MemoryEngine {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the commit with zero-based sequence number `n` fail.
    pub fn fail_commit_at(mut self, n: usize) -> Self {
        self.fail_commit_at = Some(n);
        self
    }

    /// Make the checkout with zero-based sequence number `n` fail.
    pub fn fail_checkout_at(mut self, n: usize) -> Self {
        self.fail_checkout_at = Some(n);
        self
    }

    /// Make every remote registration fail.
    pub fn fail_create_remote(mut self) -> Self {
        self.fail_create_remote = true;
        self
    }

    /// All local refs.
    pub fn refs(&self) -> &BTreeMap<RefName, Oid> {
        &self.refs
    }

    /// Look up a ref by full name.
    pub fn resolve(&self, refname: &str) -> Option<&Oid> {
        self.refs
            .iter()
            .find(|(name, _)| name.as_str() == refname)
            .map(|(_, oid)| oid)
    }

    /// Look up a commit.
    pub fn commit_by_id(&self, oid: &Oid) -> Option<&MemoryCommit> {
        self.commits.get(oid)
    }

    /// Number of commits created.
    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Look up a remote.
    pub fn remote(&self, name: &str) -> Option<&MemoryRemote> {
        self.remotes.get(name)
    }

    /// Seed a remote ref, e.g. to provoke a non-fast-forward rejection.
    pub fn set_remote_ref(&mut self, remote: &str, name: RefName, oid: Oid) -> Result<(), GitError> {
        let handle = self
            .remotes
            .get_mut(remote)
            .ok_or_else(|| GitError::RemoteNotFound {
                name: remote.to_string(),
            })?;
        handle.refs.insert(name, oid);
        Ok(())
    }

    /// Whether `ancestor` is reachable from `descendant` by parent links.
    fn is_ancestor(&self, ancestor: &Oid, descendant: &Oid) -> bool {
        let mut cursor = Some(descendant);
        while let Some(oid) = cursor {
            if oid == ancestor {
                return true;
            }
            cursor = self.commits.get(oid).and_then(|c| c.parent.as_ref());
        }
        false
    }
}

impl VcsEngine for MemoryEngine {
    fn checkout(&mut self, commit: &Oid) -> Result<(), GitError> {
        let sequence = self.checkouts;
        self.checkouts += 1;
        if self.fail_checkout_at == Some(sequence) {
            return Err(GitError::Internal {
                message: format!("injected failure at checkout {}", sequence),
            });
        }

        let files = self
            .commits
            .get(commit)
            .map(|c| c.files.clone())
            .ok_or_else(|| GitError::ObjectNotFound {
                oid: commit.to_string(),
            })?;

        self.staged = files;
        self.worktree.clear();
        self.head = Some(commit.clone());
        Ok(())
    }

    fn write_file(&mut self, path: &str, contents: &[u8]) -> Result<(), GitError> {
        validate_worktree_path(path)?;
        self.worktree.insert(path.to_string(), contents.to_vec());
        Ok(())
    }

    fn add(&mut self, path: &str) -> Result<(), GitError> {
        validate_worktree_path(path)?;
        let contents = self
            .worktree
            .get(path)
            .ok_or_else(|| GitError::PathNotFound {
                path: path.to_string(),
            })?;
        self.staged.insert(path.to_string(), contents.clone());
        Ok(())
    }

    fn commit(&mut self, message: &str, author: &Author) -> Result<Oid, GitError> {
        let sequence = self.commits.len();
        if self.fail_commit_at == Some(sequence) {
            return Err(GitError::Internal {
                message: format!("injected failure at commit {}", sequence),
            });
        }

        let oid = Oid::new(format!("{:040x}", sequence + 1))?;
        self.commits.insert(
            oid.clone(),
            MemoryCommit {
                oid: oid.clone(),
                parent: self.head.clone(),
                message: message.to_string(),
                author: author.clone(),
                files: self.staged.clone(),
            },
        );
        self.head = Some(oid.clone());
        Ok(oid)
    }

    fn set_reference(&mut self, name: &RefName, target: &Oid) -> Result<(), GitError> {
        if !self.commits.contains_key(target) {
            return Err(GitError::ObjectNotFound {
                oid: target.to_string(),
            });
        }
        self.refs.insert(name.clone(), target.clone());
        Ok(())
    }

    fn create_remote(&mut self, remote: &RemoteSpec) -> Result<(), GitError> {
        if self.fail_create_remote {
            return Err(GitError::AccessError {
                message: format!("injected failure registering {}", remote.name),
            });
        }
        if self.remotes.contains_key(&remote.name) {
            return Err(GitError::RemoteExists {
                name: remote.name.clone(),
            });
        }
        self.remotes.insert(
            remote.name.clone(),
            MemoryRemote {
                url: remote.url.clone(),
                fetch: remote.fetch.clone(),
                refs: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn push(&mut self, remote: &str, refspecs: &[Refspec]) -> Result<(), GitError> {
        let existing = self
            .remotes
            .get(remote)
            .ok_or_else(|| GitError::RemoteNotFound {
                name: remote.to_string(),
            })?
            .refs
            .clone();

        let mut updates = Vec::new();
        for spec in refspecs {
            for concrete in spec.expand(self.refs.keys().map(RefName::as_str)) {
                let Some(oid) = self.resolve(concrete.src()).cloned() else {
                    continue;
                };
                let dst = RefName::new(concrete.dst())?;
                if let Some(current) = existing.get(&dst) {
                    if !concrete.is_force() && !self.is_ancestor(current, &oid) {
                        return Err(GitError::PushRejected {
                            refname: dst.to_string(),
                            message: "non-fast-forward".to_string(),
                        });
                    }
                }
                updates.push((dst, oid));
            }
        }

        if let Some(handle) = self.remotes.get_mut(remote) {
            handle.refs.extend(updates);
        }
        Ok(())
    }
}
