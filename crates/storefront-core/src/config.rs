//! Storefront configuration
//!
//! Layered the usual way: built-in defaults, then an optional TOML file, then
//! `STOREFRONT_*` environment variables, then validation.

use crate::StorefrontError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables that override file settings
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Runtime configuration for the bot and its live views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Cards per page; fixed for the lifetime of a browsing session
    pub page_size: usize,
    /// Text of the navigation control message
    pub control_text: String,
    /// Directory item pictures are resolved against
    pub media_root: PathBuf,
    /// Remove the cards of a previous session when the same view is reopened
    pub clear_superseded_views: bool,
    /// Expire browsing sessions after this many seconds of inactivity
    pub session_ttl_secs: Option<u64>,
    /// Greeting sent on `/start`; `{name}` is replaced by the user's name
    pub greeting: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            page_size: 3,
            control_text: "Pages".to_string(),
            media_root: PathBuf::from("."),
            clear_superseded_views: true,
            session_ttl_secs: None,
            greeting: "Hello, {name}, welcome to the store".to_string(),
        }
    }
}

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Offending field
    pub field: &'static str,
    /// What is wrong with it
    pub error: String,
}

impl StorefrontConfig {
    /// Load configuration from a TOML file; a missing file yields defaults
    pub fn load_from_file(path: &Path) -> Result<Self, StorefrontError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StorefrontError::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content).map_err(|e| {
            StorefrontError::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, StorefrontError> {
        toml::from_str(content).map_err(|e| StorefrontError::config(e.to_string()))
    }

    /// Apply `STOREFRONT_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<(), StorefrontError> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `STOREFRONT_*` overrides from an explicit variable list
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), StorefrontError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "PAGE_SIZE" => self.page_size = parse_env(&key, &value)?,
                "CONTROL_TEXT" => self.control_text = value,
                "MEDIA_ROOT" => self.media_root = PathBuf::from(value),
                "CLEAR_SUPERSEDED_VIEWS" => self.clear_superseded_views = parse_env(&key, &value)?,
                "SESSION_TTL_SECS" => {
                    self.session_ttl_secs = if value.is_empty() {
                        None
                    } else {
                        Some(parse_env(&key, &value)?)
                    }
                }
                "GREETING" => self.greeting = value,
                _ => tracing::debug!(variable = %key, "ignoring unknown storefront variable"),
            }
        }
        Ok(())
    }

    /// Check every rule and report all violations
    pub fn validation_errors(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.page_size == 0 {
            errors.push(ConfigValidationError {
                field: "page_size",
                error: "Page size must be at least 1".to_string(),
            });
        }

        if self.control_text.trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "control_text",
                error: "Control text cannot be empty".to_string(),
            });
        }

        if self.session_ttl_secs == Some(0) {
            errors.push(ConfigValidationError {
                field: "session_ttl_secs",
                error: "Session TTL must be positive; omit it to disable expiry".to_string(),
            });
        }

        errors
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), StorefrontError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            return Ok(());
        }
        let joined = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.error))
            .collect::<Vec<_>>()
            .join("; ");
        Err(StorefrontError::config(joined))
    }

    /// Defaults, file, environment, validation - in that order
    pub fn load(path: &Path) -> Result<Self, StorefrontError> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Session expiry as a duration
    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }

    /// Greeting with the user's name filled in
    pub fn greeting_for(&self, name: &str) -> String {
        self.greeting.replace("{name}", name)
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, StorefrontError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| StorefrontError::config(format!("{key}={value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorefrontConfig::load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 5\ncontrol_text = \"Switch\"").unwrap();

        let config = StorefrontConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.control_text, "Switch");
        assert!(config.clear_superseded_views);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = \"many\"").unwrap();

        let err = StorefrontConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, StorefrontError::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = StorefrontConfig::default();
        config
            .merge_with_vars(vec![
                ("STOREFRONT_PAGE_SIZE".to_string(), "4".to_string()),
                ("STOREFRONT_SESSION_TTL_SECS".to_string(), "600".to_string()),
                ("STOREFRONT_CLEAR_SUPERSEDED_VIEWS".to_string(), "false".to_string()),
                ("HOME".to_string(), "/root".to_string()),
            ])
            .unwrap();

        assert_eq!(config.page_size, 4);
        assert_eq!(config.session_ttl(), Some(Duration::from_secs(600)));
        assert!(!config.clear_superseded_views);
    }

    #[test]
    fn test_bad_env_value_is_rejected() {
        let mut config = StorefrontConfig::default();
        let result = config.merge_with_vars(vec![(
            "STOREFRONT_PAGE_SIZE".to_string(),
            "three".to_string(),
        )]);
        assert!(matches!(result, Err(StorefrontError::Config { .. })));
    }

    #[test]
    fn test_validation_reports_each_field() {
        let config = StorefrontConfig {
            page_size: 0,
            control_text: "  ".to_string(),
            session_ttl_secs: Some(0),
            ..StorefrontConfig::default()
        };
        let fields: Vec<&str> = config.validation_errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["page_size", "control_text", "session_ttl_secs"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_greeting_template() {
        let config = StorefrontConfig::default();
        assert_eq!(
            config.greeting_for("Ann"),
            "Hello, Ann, welcome to the store"
        );
    }
}
