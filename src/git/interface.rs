//! git::interface
//!
//! Engine implementation using git2.
//!
//! This is the only module that imports `git2`. It implements
//! [`VcsEngine`] on a bare repository and adds the read-only queries tests
//! and reports need.
//!
//! # Storage
//!
//! Objects and refs live in a bare repository, either in a scratch temporary
//! directory removed when the engine is dropped or at a caller-chosen path.
//! Nothing is checked out on disk: the working tree is an in-memory file map
//! and the staging area is an in-memory libgit2 index, so a run never
//! touches files outside the object database.
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
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use tempfile::TempDir;

use super::engine::validate_worktree_path;
use super::{Author, GitError, Refspec, RemoteSpec, VcsEngine};
use crate::core::types::{BranchName, Oid, RefName};

/// Reflog message recorded for every ref the engine writes.
const REFLOG_MESSAGE: &str = "git-brancher: create branch";

/// Credential callbacks give up after this many attempts instead of letting
/// libgit2 retry forever.
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Regular, non-executable file mode.
const FILE_MODE: u32 = 0o100644;

/// What a failed git2 call was looking up. Decides how `NotFound` maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// A ref by name
    Ref,
    /// An object by id
    Object,
    /// Anything else (paths, remotes, repository setup)
    Other,
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, lookup: Lookup, context: &str) -> Self {
        match (err.code(), lookup) {
            (git2::ErrorCode::NotFound, Lookup::Ref) => GitError::RefNotFound {
                refname: context.to_string(),
            },
            (git2::ErrorCode::NotFound, Lookup::Object) => GitError::ObjectNotFound {
                oid: context.to_string(),
            },
            (git2::ErrorCode::InvalidSpec, _) => GitError::InvalidRefName {
                message: format!("{}: {}", context, err.message()),
            },
            (git2::ErrorCode::Locked, _) => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

/// A ref with its name and target OID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    /// The full ref name
    pub name: RefName,
    /// The OID the ref points to
    pub oid: Oid,
}

/// Information about a commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// The commit OID
    pub oid: Oid,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub author_time: chrono::DateTime<chrono::Utc>,
}

fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|_| GitError::InvalidOid {
        oid: oid.to_string(),
    })
}

fn from_git2(oid: git2::Oid) -> Result<Oid, GitError> {
    Oid::new(oid.to_string()).map_err(GitError::from)
}

/// The libgit2-backed engine.
pub struct GitEngine {
    /// The underlying bare repository
    repo: git2::Repository,
    /// Staging area, never written to disk
    index: git2::Index,
    /// Files written but not necessarily staged
    worktree: BTreeMap<String, Vec<u8>>,
    /// Commit the next commit builds on; `None` until the first commit
    head: Option<git2::Oid>,
    /// Keeps the scratch directory alive; dropped after `repo`
    scratch: Option<TempDir>,
}

impl std::fmt::Debug for GitEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitEngine")
            .field("path", &self.repo.path())
            .field("head", &self.head)
            .field("scratch", &self.scratch.is_some())
            .finish()
    }
}

impl GitEngine {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Initialize a fresh bare repository in a scratch directory that is
    /// removed when the engine is dropped.
    pub fn scratch() -> Result<Self, GitError> {
        let dir = tempfile::Builder::new()
            .prefix("git-brancher-")
            .tempdir()
            .map_err(|e| GitError::AccessError {
                message: format!("cannot create scratch directory: {}", e),
            })?;
        let repo = git2::Repository::init_bare(dir.path())
            .map_err(|e| GitError::from_git2(e, Lookup::Other, "init scratch repository"))?;
        Self::with_repo(repo, Some(dir))
    }

    /// Initialize a fresh bare repository at `path`, creating directories as
    /// needed. The repository outlives the engine.
    ///
    /// # Errors
    ///
    /// - [`GitError::AlreadyExists`] if `path` already holds a repository
    pub fn init(path: &Path) -> Result<Self, GitError> {
        if git2::Repository::open(path).is_ok() {
            return Err(GitError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let repo = git2::Repository::init_bare(path).map_err(|e| GitError::AccessError {
            message: format!("cannot initialize {}: {}", path.display(), e.message()),
        })?;
        Self::with_repo(repo, None)
    }

    /// Open an existing repository (bare or not) for inspection.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found at `path`
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Self::with_repo(repo, None)
    }

    fn with_repo(repo: git2::Repository, scratch: Option<TempDir>) -> Result<Self, GitError> {
        let index = git2::Index::new()?;
        Ok(Self {
            repo,
            index,
            worktree: BTreeMap::new(),
            head: None,
            scratch,
        })
    }

    /// Path of the repository's git directory.
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// Whether the repository is deleted when the engine is dropped.
    pub fn is_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    // =========================================================================
    // Ref Queries
    // =========================================================================

    /// Resolve a ref to the commit it points at.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the ref doesn't exist
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| GitError::from_git2(e, Lookup::Ref, refname))?;

        let oid = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, Lookup::Ref, refname))?
            .id();

        from_git2(oid)
    }

    /// List all refs matching a prefix, sorted by name.
    pub fn list_refs_by_prefix(&self, prefix: &str) -> Result<Vec<RefEntry>, GitError> {
        let pattern = format!("{}*", prefix);
        let refs = self.repo.references_glob(&pattern)?;

        let mut entries = Vec::new();
        for reference in refs {
            let reference = reference?;

            // Skip refs with non-UTF8 or otherwise unusable names
            let Some(name) = reference.name() else {
                continue;
            };
            let Ok(name) = RefName::new(name) else {
                continue;
            };
            let Some(target) = reference.resolve().ok().and_then(|r| r.target()) else {
                continue;
            };

            entries.push(RefEntry {
                name,
                oid: from_git2(target)?,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// List all local branches with their tips, sorted by name.
    pub fn list_branches(&self) -> Result<Vec<(BranchName, Oid)>, GitError> {
        Ok(self
            .list_refs_by_prefix(RefName::HEADS_PREFIX)?
            .into_iter()
            .filter_map(|entry| entry.name.branch_name().map(|name| (name, entry.oid)))
            .collect())
    }

    // =========================================================================
    // Commit Queries
    // =========================================================================

    /// Get information about a commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2(oid)?)
            .map_err(|e| GitError::from_git2(e, Lookup::Object, oid.as_str()))?;

        let author = commit.author();
        let author_time = chrono::DateTime::from_timestamp(author.when().seconds(), 0)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH);

        Ok(CommitInfo {
            oid: oid.clone(),
            message: commit.message().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            author_time,
        })
    }

    /// Get the parent OIDs of a commit. Empty for root commits.
    pub fn commit_parents(&self, oid: &Oid) -> Result<Vec<Oid>, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2(oid)?)
            .map_err(|e| GitError::from_git2(e, Lookup::Object, oid.as_str()))?;

        commit.parent_ids().map(from_git2).collect()
    }

    /// Read every file in a commit's tree, keyed by slash-separated path.
    pub fn tree_files(&self, oid: &Oid) -> Result<BTreeMap<String, Vec<u8>>, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2(oid)?)
            .map_err(|e| GitError::from_git2(e, Lookup::Object, oid.as_str()))?;
        let tree = commit.tree()?;

        let mut files = BTreeMap::new();
        self.collect_tree(&tree, "", &mut files)?;
        Ok(files)
    }

    fn collect_tree(
        &self,
        tree: &git2::Tree<'_>,
        prefix: &str,
        files: &mut BTreeMap<String, Vec<u8>>,
    ) -> Result<(), GitError> {
        for entry in tree.iter() {
            let name = String::from_utf8_lossy(entry.name_bytes());
            let path = format!("{}{}", prefix, name);
            match entry.kind() {
                Some(git2::ObjectType::Blob) => {
                    let blob = self.repo.find_blob(entry.id())?;
                    files.insert(path, blob.content().to_vec());
                }
                Some(git2::ObjectType::Tree) => {
                    let subtree = self.repo.find_tree(entry.id())?;
                    self.collect_tree(&subtree, &format!("{}/", path), files)?;
                }
                // Submodule links carry no content of their own.
                _ => {}
            }
        }
        Ok(())
    }

    // =========================================================================
    // Remote Queries
    // =========================================================================

    /// Get the URL of a remote, if it exists.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, Lookup::Other, name)),
        }
    }

    /// Names of every ref in the repository, used to expand glob refspecs.
    fn all_ref_names(&self) -> Result<Vec<String>, GitError> {
        let mut names = Vec::new();
        for reference in self.repo.references()? {
            if let Some(name) = reference?.name() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl VcsEngine for GitEngine {
    fn checkout(&mut self, commit: &Oid) -> Result<(), GitError> {
        let oid = to_git2(commit)?;
        let tree = self
            .repo
            .find_commit(oid)
            .map_err(|e| GitError::from_git2(e, Lookup::Object, commit.as_str()))?
            .tree()?;

        self.index.read_tree(&tree)?;
        self.worktree.clear();
        self.head = Some(oid);
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

        let blob = self.repo.blob(contents)?;
        let entry = git2::IndexEntry {
            ctime: git2::IndexTime::new(0, 0),
            mtime: git2::IndexTime::new(0, 0),
            dev: 0,
            ino: 0,
            mode: FILE_MODE,
            uid: 0,
            gid: 0,
            file_size: u32::try_from(contents.len()).unwrap_or(u32::MAX),
            id: blob,
            flags: 0,
            flags_extended: 0,
            path: path.as_bytes().to_vec(),
        };

        self.index
            .add(&entry)
            .map_err(|e| GitError::from_git2(e, Lookup::Other, path))
    }

    fn commit(&mut self, message: &str, author: &Author) -> Result<Oid, GitError> {
        let tree_id = self.index.write_tree_to(&self.repo)?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = git2::Signature::now(&author.name, &author.email)?;

        let parent = self
            .head
            .map(|oid| self.repo.find_commit(oid))
            .transpose()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(None, &signature, &signature, message, &tree, &parents)?;
        self.head = Some(oid);

        from_git2(oid)
    }

    fn set_reference(&mut self, name: &RefName, target: &Oid) -> Result<(), GitError> {
        self.repo
            .reference(name.as_str(), to_git2(target)?, true, REFLOG_MESSAGE)
            .map_err(|e| GitError::from_git2(e, Lookup::Other, name.as_str()))?;
        Ok(())
    }

    fn create_remote(&mut self, remote: &RemoteSpec) -> Result<(), GitError> {
        if self.repo.find_remote(&remote.name).is_ok() {
            return Err(GitError::RemoteExists {
                name: remote.name.clone(),
            });
        }

        self.repo
            .remote_with_fetch(&remote.name, &remote.url, &remote.fetch.to_string())
            .map_err(|e| GitError::from_git2(e, Lookup::Other, &remote.name))?;
        Ok(())
    }

    fn push(&mut self, remote: &str, refspecs: &[Refspec]) -> Result<(), GitError> {
        let mut handle = self.repo.find_remote(remote).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::RemoteNotFound {
                name: remote.to_string(),
            },
            _ => GitError::from_git2(e, Lookup::Other, remote),
        })?;

        let local = self.all_ref_names()?;
        let concrete: Vec<String> = refspecs
            .iter()
            .flat_map(|spec| spec.expand(local.iter().map(String::as_str)))
            .map(|spec| spec.to_string())
            .collect();

        if concrete.is_empty() {
            return Ok(());
        }

        let mut rejected: Vec<(String, String)> = Vec::new();
        {
            let mut attempts = 0;
            let mut callbacks = git2::RemoteCallbacks::new();
            callbacks.credentials(|url, username, allowed| {
                attempts += 1;
                if attempts > MAX_CREDENTIAL_ATTEMPTS {
                    return Err(git2::Error::from_str("authentication failed"));
                }
                if allowed.contains(git2::CredentialType::SSH_KEY) {
                    if let Some(user) = username {
                        return git2::Cred::ssh_key_from_agent(user);
                    }
                }
                if allowed.contains(git2::CredentialType::USER_PASS_PLAINTEXT) {
                    let config = git2::Config::open_default()?;
                    return git2::Cred::credential_helper(&config, url, username);
                }
                git2::Cred::default()
            });
            callbacks.push_update_reference(|refname, status| {
                if let Some(message) = status {
                    rejected.push((refname.to_string(), message.to_string()));
                }
                Ok(())
            });

            let mut options = git2::PushOptions::new();
            options.remote_callbacks(callbacks);

            handle
                .push(&concrete, Some(&mut options))
                .map_err(|e| GitError::from_git2(e, Lookup::Other, remote))?;
        }

        match rejected.into_iter().next() {
            Some((refname, message)) => Err(GitError::PushRejected { refname, message }),
            None => Ok(()),
        }
    }
}
