//! cli
//!
//! Command-line interface layer for git-brancher.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Initialize logging and load configuration
//! - Build the engine and hand it to the [`crate::generator`]
//! - Print the report
//!
//! The CLI layer is thin: every repository mutation happens inside
//! [`crate::generator::generate`].

pub mod args;

pub use args::Cli;

use std::io::IsTerminal;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::config::Config;
use crate::generator::{self, GenerationReport, GeneratorOptions, PushTarget, SeedFile};
use crate::git::{Author, GitEngine};
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    init_logging(verbosity);

    let report = execute(&cli)?;

    if cli.json {
        let json = output::format_report_json(&report).context("unable to encode report")?;
        println!("{}", json);
    } else {
        output::print(output::format_report(&report, verbosity), verbosity);
        if let Some(dir) = &cli.output {
            output::print(format!("repository written to {}", dir.display()), verbosity);
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Translate parsed arguments into a generation run and perform it.
pub fn execute(cli: &Cli) -> Result<GenerationReport> {
    let config = Config::load(cli.config.as_deref()).context("unable to load configuration")?;
    if let Some(path) = config.loaded_from() {
        tracing::debug!(path = %path.display(), "loaded configuration");
    }

    let options = GeneratorOptions {
        open: cli.open,
        merge: cli.merge,
        seed_files: SeedFile::load_all(&cli.files)?,
        author: Author::new(config.author_name(), config.author_email()),
        push: cli.push.as_ref().map(|url| PushTarget {
            remote: config.remote().to_string(),
            url: url.clone(),
        }),
    };

    let mut engine = match &cli.output {
        Some(dir) => GitEngine::init(dir)
            .with_context(|| format!("unable to init git repository at {}", dir.display()))?,
        None => GitEngine::scratch().context("unable to init git repository")?,
    };
    tracing::debug!(
        path = %engine.path().display(),
        branches = options.branch_count(),
        "repository initialized"
    );

    let report = generator::generate(&mut engine, &options)?;
    Ok(report)
}
