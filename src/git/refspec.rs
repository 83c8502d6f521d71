//! git::refspec
//!
//! Refspec parsing and glob expansion.
//!
//! A refspec is `[+]<src>:<dst>`. Either side may contain a single `*`
//! wildcard, and if one side does the other must too. Expansion turns a
//! glob refspec into one concrete refspec per matching local ref, which is
//! what the push transport consumes.
//!
//! # Example
//!
//! ```
//! use git_brancher::git::Refspec;
//!
//! let spec: Refspec = "refs/heads/*:refs/heads/*".parse().unwrap();
//! let concrete = spec.expand(["refs/heads/master", "refs/tags/v1"]);
//! assert_eq!(concrete.len(), 1);
//! assert_eq!(concrete[0].to_string(), "refs/heads/master:refs/heads/master");
//! ```

use std::fmt;
use std::str::FromStr;

use super::GitError;

/// A parsed refspec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refspec {
    force: bool,
    src: String,
    dst: String,
}

impl Refspec {
    /// Parse a refspec string.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::InvalidRefspec`] if the refspec has no `:`, an empty
    /// side, or mismatched wildcards.
    pub fn parse(spec: &str) -> Result<Self, GitError> {
        let invalid = |message: &str| GitError::InvalidRefspec {
            spec: spec.to_string(),
            message: message.to_string(),
        };

        let (force, body) = match spec.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };

        let (src, dst) = body
            .split_once(':')
            .ok_or_else(|| invalid("expected <src>:<dst>"))?;

        if dst.contains(':') {
            return Err(invalid("more than one ':'"));
        }
        if src.is_empty() || dst.is_empty() {
            return Err(invalid("source and destination must be non-empty"));
        }

        let src_globs = src.matches('*').count();
        let dst_globs = dst.matches('*').count();
        if src_globs > 1 || dst_globs > 1 {
            return Err(invalid("at most one '*' per side"));
        }
        if src_globs != dst_globs {
            return Err(invalid("'*' must appear on both sides or neither"));
        }

        Ok(Self {
            force,
            src: src.to_string(),
            dst: dst.to_string(),
        })
    }

    /// Whether the update is forced (`+` prefix).
    pub fn is_force(&self) -> bool {
        self.force
    }

    /// Whether both sides contain a wildcard.
    pub fn is_glob(&self) -> bool {
        self.src.contains('*')
    }

    /// The source side.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// The destination side.
    pub fn dst(&self) -> &str {
        &self.dst
    }

    /// The part of `name` matched by the source wildcard, or the empty string
    /// for an exact match of a non-glob source.
    fn capture<'a>(&self, name: &'a str) -> Option<&'a str> {
        match self.src.split_once('*') {
            None => (name == self.src).then_some(""),
            Some((prefix, suffix)) => {
                let rest = name.strip_prefix(prefix)?;
                let captured = rest.strip_suffix(suffix)?;
                (!captured.is_empty()).then_some(captured)
            }
        }
    }

    /// Check whether a ref name matches the source side.
    pub fn matches(&self, name: &str) -> bool {
        self.capture(name).is_some()
    }

    /// Map a matching source ref name to its destination.
    pub fn transform(&self, name: &str) -> Option<String> {
        let captured = self.capture(name)?;
        Some(self.dst.replacen('*', captured, 1))
    }

    /// Expand against a set of ref names, returning one concrete refspec per
    /// match in input order. A non-glob refspec expands to itself when its
    /// source is present.
    pub fn expand<'a, I>(&self, names: I) -> Vec<Refspec>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|name| {
                self.transform(name).map(|dst| Refspec {
                    force: self.force,
                    src: name.to_string(),
                    dst,
                })
            })
            .collect()
    }
}

impl FromStr for Refspec {
    type Err = GitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Refspec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.force {
            write!(f, "+")?;
        }
        write!(f, "{}:{}", self.src, self.dst)
    }
}
