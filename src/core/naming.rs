//! core::naming
//!
//! The fixed naming scheme for generated branches.
//!
//! # Scheme
//!
//! - `master` - the root branch every other branch forks from
//! - `pr-open-<i>` - one commit ahead of master
//! - `x-pr-merge-<i>` - merge target, one commit ahead of master
//! - `pr-merge-<i>` - merge source, one commit ahead of `x-pr-merge-<i>`
//!
//! Names never depend on user input, so construction cannot fail.

use super::types::BranchName;

/// Name of the root branch.
pub const MASTER: &str = "master";

/// Prefix of open branches.
pub const OPEN_PREFIX: &str = "pr-open-";

/// Prefix of merge source branches.
pub const MERGE_SOURCE_PREFIX: &str = "pr-merge-";

/// Prefix of merge target branches.
pub const MERGE_TARGET_PREFIX: &str = "x-pr-merge-";

/// Refspec used to push every local branch under the same name.
pub const PUSH_ALL_BRANCHES: &str = "refs/heads/*:refs/heads/*";

/// Fetch refspec registered with the remote named `remote`.
///
/// ```
/// use git_brancher::core::naming::fetch_refspec;
///
/// assert_eq!(fetch_refspec("origin"), "+refs/heads/*:refs/remotes/origin/*");
/// ```
pub fn fetch_refspec(remote: &str) -> String {
    format!("+refs/heads/*:refs/remotes/{remote}/*")
}

fn fixed(name: String) -> BranchName {
    // Constant prefixes plus decimal digits always satisfy the refname rules.
    BranchName::new(name).unwrap_or_else(|e| unreachable!("generated branch name rejected: {e}"))
}

fn indexed(prefix: &str, index: u64) -> BranchName {
    fixed(format!("{prefix}{index}"))
}

/// The root branch.
pub fn master() -> BranchName {
    fixed(MASTER.to_string())
}

/// Open branch number `index`.
///
/// ```
/// use git_brancher::core::naming::open_branch;
///
/// assert_eq!(open_branch(4).as_str(), "pr-open-4");
/// ```
pub fn open_branch(index: u64) -> BranchName {
    indexed(OPEN_PREFIX, index)
}

/// Merge target branch of pair `index`.
pub fn merge_target(index: u64) -> BranchName {
    indexed(MERGE_TARGET_PREFIX, index)
}

/// Merge source branch of pair `index`.
pub fn merge_source(index: u64) -> BranchName {
    indexed(MERGE_SOURCE_PREFIX, index)
}

/// Total number of branches a run creates, master included.
///
/// Saturates instead of overflowing for absurd inputs.
pub fn branch_count(open: u64, merge: u64) -> u64 {
    1u64.saturating_add(open)
        .saturating_add(merge.saturating_mul(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_names() {
        assert_eq!(master().as_str(), "master");
        assert_eq!(open_branch(0).as_str(), "pr-open-0");
        assert_eq!(merge_target(12).as_str(), "x-pr-merge-12");
        assert_eq!(merge_source(12).as_str(), "pr-merge-12");
    }

    #[test]
    fn counts() {
        assert_eq!(branch_count(0, 0), 1);
        assert_eq!(branch_count(3, 2), 8);
        assert_eq!(branch_count(u64::MAX, 1), u64::MAX);
    }

    proptest! {
        #[test]
        fn indexed_names_never_collide(i in 0u64..1_000_000, j in 0u64..1_000_000) {
            prop_assert_ne!(open_branch(i), merge_target(j));
            prop_assert_ne!(open_branch(i), merge_source(j));
            prop_assert_ne!(merge_target(i), merge_source(j));
            prop_assert_ne!(master(), open_branch(i));
        }
    }
}
