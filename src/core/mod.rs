//! core
//!
//! Core domain types and configuration for git-brancher.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Oid, RefName
//! - [`naming`] - The generated branch naming scheme
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid names from reaching git
//! - Schemas are strict and self-describing

pub mod config;
pub mod naming;
pub mod types;
