//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: the remote name must be usable
//! as a ref path component and the author identity must be non-empty.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// User configuration.
///
/// # Example
///
/// ```toml
/// remote = "origin"
///
/// [author]
/// name = "Bench Bot"
/// email = "bench@example.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Remote name registered before pushing (default: "origin")
    pub remote: Option<String>,

    /// Commit identity
    pub author: Option<AuthorConfig>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote {
            if remote.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "remote cannot be empty".to_string(),
                ));
            }
            if remote.contains('/') {
                return Err(ConfigError::InvalidValue(format!(
                    "remote '{}' cannot contain '/'",
                    remote
                )));
            }
            BranchName::new(remote.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid remote name: {}", e))
            })?;
        }

        if let Some(author) = &self.author {
            author.validate()?;
        }

        Ok(())
    }
}

/// Commit author/committer identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorConfig {
    /// Author name
    pub name: Option<String>,

    /// Author email
    pub email: Option<String>,
}

impl AuthorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue(
                "author name cannot be empty".to_string(),
            ));
        }
        if self.email.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue(
                "author email cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let config: FileConfig = toml::from_str(
            r#"
            remote = "bench"

            [author]
            name = "Bench Bot"
            email = "bench@example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.as_deref(), Some("bench"));
        let author = config.author.as_ref().unwrap();
        assert_eq!(author.name.as_deref(), Some("Bench Bot"));
        assert_eq!(author.email.as_deref(), Some("bench@example.com"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_rules() {
        for bad in ["", "a/b", "a b", ".hidden"] {
            let config = FileConfig {
                remote: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted remote {:?}", bad);
        }
    }

    #[test]
    fn empty_author_fields_rejected() {
        let config = FileConfig {
            author: Some(AuthorConfig {
                name: Some(String::new()),
                email: None,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = FileConfig {
            author: Some(AuthorConfig {
                name: None,
                email: Some(String::new()),
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<FileConfig>("trunk = \"main\"").is_err());
        assert!(toml::from_str::<FileConfig>("[author]\nlogin = \"x\"").is_err());
    }
}
