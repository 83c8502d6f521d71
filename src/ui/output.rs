//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, the report is machine-readable JSON.

use std::fmt::{Display, Write as _};

use crate::generator::GenerationReport;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins over debug.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Default `tracing` filter directive for this verbosity.
    pub fn log_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Debug => "debug",
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Render a report as a short human-readable summary.
///
/// Lists the branch count, master commit, phase timings and, in debug mode,
/// every branch with its commit.
pub fn format_report(report: &GenerationReport, verbosity: Verbosity) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "created {} branches (master at {})",
        report.branch_count(),
        report.master.short(7)
    );
    let timings = &report.timings;
    let _ = writeln!(out, "  master: {:?}", timings.master);
    let _ = writeln!(out, "  open:   {:?}", timings.open);
    let _ = write!(out, "  merge:  {:?}", timings.merge);
    if let (Some(push), Some(url)) = (timings.push, &report.pushed_to) {
        let _ = write!(out, "\n  push:   {:?} ({})", push, url);
    }

    if verbosity == Verbosity::Debug {
        for branch in &report.branches {
            let _ = write!(out, "\n  {} {}", branch.oid.short(7), branch.name);
        }
    }

    out
}

/// Render a report as pretty JSON.
pub fn format_report_json(report: &GenerationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
