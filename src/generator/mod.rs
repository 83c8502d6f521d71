//! generator
//!
//! The branch generator: drives a [`VcsEngine`] through one linear sequence
//! that fills a repository with branches.
//!
//! # Sequence
//!
//! 1. `master`: seed files (or a placeholder), one root commit
//! 2. For each open index: checkout master, commit `pr-open-<i>`
//! 3. For each merge index: checkout master, commit `x-pr-merge-<i>`, then
//!    commit `pr-merge-<i>` on top of it without resetting
//! 4. Optionally register a remote and push every local branch
//!
//! Every branch commit adds one file (path and content both equal to the
//! branch name), uses the branch name as its message, and is recorded as
//! `refs/heads/<name>`.
//!
//! # Failure Policy
//!
//! The first failure aborts the run. Errors carry the phase and branch
//! index; a half-built fixture is useless, so nothing is retried or cleaned.

mod report;
mod seed;

pub use report::{CreatedBranch, GenerationReport, Timings};
pub use seed::SeedFile;

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::core::naming;
use crate::core::types::{BranchName, Oid, RefName};
use crate::git::{Author, GitError, Refspec, RemoteSpec, VcsEngine};

/// Where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating the root branch
    Master,
    /// Creating open branch `index`
    Open { index: u64 },
    /// Creating the target branch of merge pair `index`
    MergeTarget { index: u64 },
    /// Creating the source branch of merge pair `index`
    MergeSource { index: u64 },
    /// Registering the remote or pushing
    Push,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Master => write!(f, "master"),
            Phase::Open { index } => write!(f, "open branch #{}", index),
            Phase::MergeTarget { index } => write!(f, "merge pair #{} target", index),
            Phase::MergeSource { index } => write!(f, "merge pair #{} source", index),
            Phase::Push => write!(f, "push"),
        }
    }
}

/// Errors from a generation run. All are fatal.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A seed file could not be read.
    #[error("unable to read file '{}'", .path.display())]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A seed path has no usable base name.
    #[error("file path '{}' has no usable file name", .path.display())]
    InvalidSeedPath { path: PathBuf },

    /// Resetting to master before a branch failed.
    #[error("unable to checkout master for {phase}")]
    Checkout { phase: Phase, source: GitError },

    /// Writing, staging, committing or referencing a branch failed.
    #[error("unable to create branch {branch} ({phase})")]
    Branch {
        phase: Phase,
        branch: BranchName,
        source: GitError,
    },

    /// Registering the remote failed.
    #[error("unable to create git remote '{remote}' for {url}")]
    Remote {
        remote: String,
        url: String,
        source: GitError,
    },

    /// The push failed or a ref was rejected.
    #[error("unable to push to {url}")]
    Push { url: String, source: GitError },
}

impl GenerateError {
    /// The phase the run was in, if the error happened after loading seeds.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            GenerateError::SeedFile { .. } | GenerateError::InvalidSeedPath { .. } => None,
            GenerateError::Checkout { phase, .. } | GenerateError::Branch { phase, .. } => {
                Some(*phase)
            }
            GenerateError::Remote { .. } | GenerateError::Push { .. } => Some(Phase::Push),
        }
    }
}

/// Push destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    /// Remote name to register
    pub remote: String,
    /// Remote URL (or local path)
    pub url: String,
}

/// Inputs of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Number of open branches
    pub open: u64,
    /// Number of merge pairs
    pub merge: u64,
    /// Files committed to master instead of the placeholder
    pub seed_files: Vec<SeedFile>,
    /// Commit identity
    pub author: Author,
    /// Optional push destination
    pub push: Option<PushTarget>,
}

impl GeneratorOptions {
    /// Options with no seed files and no push.
    pub fn new(open: u64, merge: u64, author: Author) -> Self {
        Self {
            open,
            merge,
            seed_files: Vec::new(),
            author,
            push: None,
        }
    }

    /// Total branches the run will create, master included.
    pub fn branch_count(&self) -> u64 {
        naming::branch_count(self.open, self.merge)
    }
}

/// Write, stage and commit one branch, then record its ref.
///
/// With seed files, each is written under its base name; otherwise a single
/// placeholder file named after the branch is created.
fn commit_branch<E: VcsEngine>(
    engine: &mut E,
    branch: &BranchName,
    seeds: &[SeedFile],
    author: &Author,
) -> Result<Oid, GitError> {
    if seeds.is_empty() {
        engine.write_file(branch.as_str(), branch.as_str().as_bytes())?;
        engine.add(branch.as_str())?;
    } else {
        for seed in seeds {
            engine.write_file(&seed.name, &seed.contents)?;
            engine.add(&seed.name)?;
        }
    }

    let oid = engine.commit(branch.as_str(), author)?;
    engine.set_reference(&RefName::for_branch(branch), &oid)?;
    Ok(oid)
}

/// Drives a single generation run and records what it created.
struct Run<'a, E: VcsEngine> {
    engine: &'a mut E,
    author: &'a Author,
    branches: Vec<CreatedBranch>,
}

impl<E: VcsEngine> Run<'_, E> {
    fn branch(
        &mut self,
        phase: Phase,
        branch: BranchName,
        seeds: &[SeedFile],
    ) -> Result<Oid, GenerateError> {
        let oid = commit_branch(&mut *self.engine, &branch, seeds, self.author).map_err(|source| {
            GenerateError::Branch {
                phase,
                branch: branch.clone(),
                source,
            }
        })?;

        tracing::debug!(branch = %branch, oid = %oid.short(7), "created branch");
        self.branches.push(CreatedBranch { name: branch, oid: oid.clone() });
        Ok(oid)
    }

    fn reset_to(&mut self, master: &Oid, phase: Phase) -> Result<(), GenerateError> {
        self.engine
            .checkout(master)
            .map_err(|source| GenerateError::Checkout { phase, source })
    }
}

/// Populate the engine's repository according to `options`.
///
/// # Errors
///
/// Returns the first failure, tagged with its phase. The repository is left
/// in whatever state the failure produced.
pub fn generate<E: VcsEngine>(
    engine: &mut E,
    options: &GeneratorOptions,
) -> Result<GenerationReport, GenerateError> {
    let mut run = Run {
        engine,
        author: &options.author,
        branches: Vec::new(),
    };
    let mut timings = Timings::default();

    let started = Instant::now();
    let master = run.branch(Phase::Master, naming::master(), &options.seed_files)?;
    timings.master = started.elapsed();

    let started = Instant::now();
    for index in 0..options.open {
        let phase = Phase::Open { index };
        run.reset_to(&master, phase)?;
        run.branch(phase, naming::open_branch(index), &[])?;
    }
    timings.open = started.elapsed();
    tracing::info!(
        "creating {} open branches took: {:?}",
        options.open,
        timings.open
    );

    let started = Instant::now();
    for index in 0..options.merge {
        let target = Phase::MergeTarget { index };
        run.reset_to(&master, target)?;
        run.branch(target, naming::merge_target(index), &[])?;
        run.branch(
            Phase::MergeSource { index },
            naming::merge_source(index),
            &[],
        )?;
    }
    timings.merge = started.elapsed();
    tracing::info!(
        "creating {} merge branches took: {:?}",
        options.merge,
        timings.merge
    );

    if let Some(target) = &options.push {
        let started = Instant::now();
        push_all(&mut *run.engine, target)?;
        let elapsed = started.elapsed();
        timings.push = Some(elapsed);
        tracing::info!(
            "pushing {}+{}*2 branches took: {:?}",
            options.open,
            options.merge,
            elapsed
        );
    }

    Ok(GenerationReport {
        master,
        branches: run.branches,
        timings,
        pushed_to: options.push.as_ref().map(|t| t.url.clone()),
    })
}

/// Register the remote and push every local branch under its own name.
fn push_all<E: VcsEngine>(engine: &mut E, target: &PushTarget) -> Result<(), GenerateError> {
    let remote_error = |source| GenerateError::Remote {
        remote: target.remote.clone(),
        url: target.url.clone(),
        source,
    };

    let remote = RemoteSpec {
        name: target.remote.clone(),
        url: target.url.clone(),
        fetch: Refspec::parse(&naming::fetch_refspec(&target.remote)).map_err(remote_error)?,
    };
    engine.create_remote(&remote).map_err(remote_error)?;

    let push_error = |source| GenerateError::Push {
        url: target.url.clone(),
        source,
    };
    let refspec = Refspec::parse(naming::PUSH_ALL_BRANCHES).map_err(push_error)?;
    engine.push(&target.remote, &[refspec]).map_err(push_error)
}
