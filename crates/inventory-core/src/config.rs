//! Backend Configuration
//!
//! Where the hosted project lives and which key the browser uses.

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_ROLE_TABLE: &str = "users";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    #[error("invalid backend url '{0}': expected http:// or https://")]
    InvalidUrl(String),
}

/// Hosted backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base url, e.g. `https://xyz.supabase.co`
    pub url: String,
    /// Public anon key sent with every request
    pub anon_key: String,
    /// Table holding `email` → `role` rows
    #[serde(default = "default_role_table")]
    pub role_table: String,
}

fn default_role_table() -> String {
    DEFAULT_ROLE_TABLE.to_string()
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            role_table: default_role_table(),
        }
    }

    pub fn with_role_table(mut self, role_table: impl Into<String>) -> Self {
        self.role_table = role_table.into();
        self
    }

    /// Check required values and normalize the url
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.url = self.url.trim().trim_end_matches('/').to_string();
        self.anon_key = self.anon_key.trim().to_string();
        self.role_table = self.role_table.trim().to_string();

        if self.url.is_empty() {
            return Err(ConfigError::Missing("backend url"));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.url));
        }
        if self.anon_key.is_empty() {
            return Err(ConfigError::Missing("anon key"));
        }
        if self.role_table.is_empty() {
            self.role_table = default_role_table();
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_normalizes_url() {
        let config = BackendConfig::new(" https://demo.supabase.co/ ", "anon")
            .validate()
            .unwrap();
        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.role_table, "users");
    }

    #[test]
    fn test_validate_rejects_missing_values() {
        assert_eq!(
            BackendConfig::new("", "anon").validate(),
            Err(ConfigError::Missing("backend url"))
        );
        assert_eq!(
            BackendConfig::new("https://demo.supabase.co", "  ").validate(),
            Err(ConfigError::Missing("anon key"))
        );
        assert!(matches!(
            BackendConfig::new("demo.supabase.co", "anon").validate(),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_role_table_defaults_when_absent() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"url": "https://demo.supabase.co", "anon_key": "k"}"#).unwrap();
        assert_eq!(config.role_table, "users");
        let config = config.with_role_table("staff_roles").validate().unwrap();
        assert_eq!(config.role_table, "staff_roles");
    }
}
