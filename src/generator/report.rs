//! generator::report
//!
//! What a run created and how long each phase took.

use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::core::types::{BranchName, Oid};

fn seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

fn optional_seconds<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_some(&d.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}

/// Wall-clock time per phase. Serialized as fractional seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timings {
    /// Root branch creation
    #[serde(serialize_with = "seconds")]
    pub master: Duration,
    /// All open branches
    #[serde(serialize_with = "seconds")]
    pub open: Duration,
    /// All merge pairs
    #[serde(serialize_with = "seconds")]
    pub merge: Duration,
    /// Remote registration plus push, if a push was requested
    #[serde(serialize_with = "optional_seconds")]
    pub push: Option<Duration>,
}

/// One created branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedBranch {
    /// Short branch name
    pub name: BranchName,
    /// Commit the branch points at
    pub oid: Oid,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// The master commit every branch forks from
    pub master: Oid,
    /// Every branch in creation order, master first
    pub branches: Vec<CreatedBranch>,
    /// Phase timings
    pub timings: Timings,
    /// Push destination, if any
    pub pushed_to: Option<String>,
}

impl GenerationReport {
    /// Number of branches created.
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_durations_as_seconds() {
        let oid = Oid::new("a".repeat(40)).unwrap();
        let report = GenerationReport {
            master: oid.clone(),
            branches: vec![CreatedBranch {
                name: BranchName::new("master").unwrap(),
                oid,
            }],
            timings: Timings {
                master: Duration::from_millis(250),
                open: Duration::from_secs(2),
                merge: Duration::ZERO,
                push: None,
            },
            pushed_to: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["timings"]["master"], 0.25);
        assert_eq!(json["timings"]["open"], 2.0);
        assert!(json["timings"]["push"].is_null());
        assert_eq!(json["branches"][0]["name"], "master");
        assert_eq!(json["master"], "a".repeat(40));
        assert_eq!(report.branch_count(), 1);
    }
}
