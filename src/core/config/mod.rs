//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values (remote `origin`, author `x <x>`)
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! The first existing file wins:
//! 1. `--config <PATH>` (must exist)
//! 2. `$GIT_BRANCHER_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/git-brancher/config.toml`
//! 4. `~/.git-brancher/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use git_brancher::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Remote: {}", config.remote());
//! println!("Author: {} <{}>", config.author_name(), config.author_email());
//! ```

pub mod schema;

pub use schema::{AuthorConfig, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GIT_BRANCHER_CONFIG";

/// Default remote name.
pub const DEFAULT_REMOTE: &str = "origin";

/// Default author name and email.
pub const DEFAULT_AUTHOR: &str = "x";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{}'", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {message}", .path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Where to look for a config file.
///
/// Captured once from the process environment so discovery itself stays a
/// pure function of its inputs.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Explicit path from the command line
    pub explicit: Option<PathBuf>,
    /// Value of `$GIT_BRANCHER_CONFIG`
    pub env_path: Option<PathBuf>,
    /// Value of `$XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
    /// The user's home directory
    pub home: Option<PathBuf>,
}

impl ConfigSources {
    /// Capture sources from the process environment.
    pub fn from_env(explicit: Option<&Path>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
            env_path: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
        }
    }

    /// Candidate files in precedence order (explicit path excluded).
    fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = &self.env_path {
            paths.push(path.clone());
        }
        if let Some(xdg) = &self.xdg_config_home {
            paths.push(xdg.join("git-brancher/config.toml"));
        }
        if let Some(home) = &self.home {
            paths.push(home.join(".git-brancher/config.toml"));
        }
        paths
    }
}

/// Resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (defaults if no file was found)
    pub file: FileConfig,
    /// Path the config was loaded from
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` does not exist, or if the selected
    /// file cannot be read, parsed, or validated. Missing default-location
    /// files are not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSources::from_env(explicit))
    }

    /// Load configuration from explicit sources.
    pub fn load_from(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let path = match &sources.explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound { path: path.clone() });
            }
            Some(path) => Some(path.clone()),
            None => sources.candidates().into_iter().find(|p| p.exists()),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        let file = Self::read_config(&path)?;
        file.validate()?;

        Ok(Self {
            file,
            loaded_from: Some(path),
        })
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the remote name. Defaults to "origin".
    pub fn remote(&self) -> &str {
        self.file.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// Get the commit author name. Defaults to "x".
    pub fn author_name(&self) -> &str {
        self.file
            .author
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .unwrap_or(DEFAULT_AUTHOR)
    }

    /// Get the commit author email. Defaults to "x".
    pub fn author_email(&self) -> &str {
        self.file
            .author
            .as_ref()
            .and_then(|a| a.email.as_deref())
            .unwrap_or(DEFAULT_AUTHOR)
    }

    /// Get the path the config was loaded from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }
}
