//! Build-time Settings
//!
//! Backend location and log level are baked in at build time from
//! `INVENTORY_*` environment variables.

use inventory_core::{BackendConfig, ConfigError};

pub const APP_NAME: &str = "gpu-inventory";

/// Lines kept for the activity log
pub const LOG_CAPACITY: usize = 200;

/// localStorage key of the persisted session
pub const SESSION_STORAGE_KEY: &str = "gpu-inventory.session";

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub backend_url: Option<String>,
    pub anon_key: Option<String>,
    pub role_table: Option<String>,
    pub log_level: String,
}

impl AppSettings {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("INVENTORY_BACKEND_URL"),
            option_env!("INVENTORY_BACKEND_ANON_KEY"),
            option_env!("INVENTORY_ROLE_TABLE"),
            option_env!("INVENTORY_LOG_LEVEL"),
        )
    }

    fn from_values(
        backend_url: Option<&str>,
        anon_key: Option<&str>,
        role_table: Option<&str>,
        log_level: Option<&str>,
    ) -> Self {
        let present = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            backend_url: present(backend_url),
            anon_key: present(anon_key),
            role_table: present(role_table),
            log_level: present(log_level).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Validated backend configuration
    pub fn backend_config(&self) -> Result<BackendConfig, ConfigError> {
        let url = self
            .backend_url
            .clone()
            .ok_or(ConfigError::Missing("INVENTORY_BACKEND_URL"))?;
        let anon_key = self
            .anon_key
            .clone()
            .ok_or(ConfigError::Missing("INVENTORY_BACKEND_ANON_KEY"))?;

        let mut config = BackendConfig::new(url, anon_key);
        if let Some(table) = &self.role_table {
            config = config.with_role_table(table.clone());
        }
        config.validate()
    }
}
