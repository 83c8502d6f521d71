//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Usage
//!
//! ```text
//! git-brancher [OPTIONS] <OPEN> <MERGE>
//! ```
//!
//! `--help` / `-h` and `--version` print and exit successfully.

use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;

/// git-brancher - generate a throwaway repository with many branches
#[derive(Parser, Debug, Clone)]
#[command(name = "git-brancher")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # 100 open branches and 50 merge pairs, discarded at exit
    git-brancher 100 50

    # Seed master with real files and push everything to a server
    git-brancher 10 10 -f README.md -f big.bin --push ssh://git@host/bench.git

    # Keep the result locally for inspection
    git-brancher 5 0 --output /tmp/bench.git")]
pub struct Cli {
    /// Number of open branches (pr-open-<i>) to create
    #[arg(value_name = "OPEN")]
    pub open: u64,

    /// Number of merge pairs (x-pr-merge-<i> + pr-merge-<i>) to create
    #[arg(value_name = "MERGE")]
    pub merge: u64,

    /// Put specified file into master branch (repeatable)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Push all local branches to the specified URL
    #[arg(short = 'p', long = "push", value_name = "URL", value_parser = NonEmptyStringValueParser::new())]
    pub push: Option<String>,

    /// Keep the generated bare repository at this path instead of discarding it
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Read configuration from this file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments, exiting on error or `--help`.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("git-brancher").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn counts_only() {
        let cli = parse(&["3", "2"]).unwrap();
        assert_eq!(cli.open, 3);
        assert_eq!(cli.merge, 2);
        assert!(cli.files.is_empty());
        assert!(cli.push.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn repeated_files_and_push() {
        let cli = parse(&[
            "1", "0", "-f", "a.txt", "--file", "dir/b.bin", "--push", "/tmp/mirror.git",
        ])
        .unwrap();
        assert_eq!(
            cli.files,
            vec![PathBuf::from("a.txt"), PathBuf::from("dir/b.bin")]
        );
        assert_eq!(cli.push.as_deref(), Some("/tmp/mirror.git"));
    }

    #[test]
    fn options_before_counts() {
        let cli = parse(&["-f", "a.txt", "-p", "url", "0", "0"]).unwrap();
        assert_eq!(cli.files.len(), 1);
        assert_eq!(cli.open, 0);
    }

    #[test]
    fn missing_counts_rejected() {
        let err = parse(&["3"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn non_numeric_counts_rejected() {
        assert_eq!(parse(&["three", "2"]).unwrap_err().kind(), ErrorKind::ValueValidation);
        assert!(parse(&["-1", "2"]).is_err());
    }

    #[test]
    fn empty_push_url_rejected() {
        assert!(parse(&["1", "1", "--push", ""]).is_err());
    }

    #[test]
    fn informational_exits() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse(&["--version"]).unwrap_err().kind(), ErrorKind::DisplayVersion);
    }
}
