//! git-brancher - generate throwaway git repositories full of branches
//!
//! The tool builds one `master` branch, N open branches forked from it, and
//! M merge pairs (a target branch plus a source branch one commit ahead of
//! it), then optionally pushes everything to a remote. The result is a
//! fixture for stress-testing review and CI systems that must cope with many
//! branches.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, builds the engine)
//! - [`generator`] - The linear branch-generation sequence
//! - [`git`] - The `VcsEngine` contract, its git2 implementation and a test double
//! - [`core`] - Domain types, naming scheme, configuration
//! - [`ui`] - Output formatting
//!
//! # Example
//!
//! ```
//! use git_brancher::generator::{generate, GeneratorOptions};
//! use git_brancher::git::{Author, MemoryEngine};
//!
//! let mut engine = MemoryEngine::new();
//! let report = generate(&mut engine, &GeneratorOptions::new(2, 1, Author::new("x", "x"))).unwrap();
//! assert_eq!(report.branches.len(), 5);
//! ```

pub mod cli;
pub mod core;
pub mod generator;
pub mod git;
pub mod ui;
