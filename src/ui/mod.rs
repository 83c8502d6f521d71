//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing and report rendering
//!
//! # Design
//!
//! Diagnostics go to stderr through `tracing`; the final summary goes to
//! stdout through this module so it can be silenced or switched to JSON.

pub mod output;
