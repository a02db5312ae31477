//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following
//! precedence (highest to lowest):
//! 1. Environment variables (prefix: CRUDKIT_)
//! 2. Current working directory: ./crudkit.toml
//! 3. Default values
//!
//! Defaults match the wire conventions this crate standardizes: 15
//! items per page, page numbers starting at 1, and `"last"` as the
//! final-page sentinel.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Top-level configuration for the CRUD base layer
///
/// Passed explicitly into [`ResourceController::new`](crate::api::ResourceController::new);
/// there are no module-level mutable defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Pagination behavior
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Field name used to look records up by identifier, reported in
    /// not-found messages
    #[serde(default = "default_lookup_field")]
    pub lookup_field: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            pagination: PaginationConfig::default(),
            lookup_field: default_lookup_field(),
            log_level: default_log_level(),
        }
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size applied when the request carries none, or carries one
    /// that does not parse as an integer
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Page number reported on the unbounded (`page_size=-1`) path
    #[serde(default = "default_page")]
    pub default_page: u64,

    /// Optional upper bound on the requested page size
    #[serde(default)]
    pub max_page_size: Option<u64>,

    /// Tokens accepted in the `page` parameter as "the final page"
    #[serde(default = "default_last_page_tokens")]
    pub last_page_tokens: Vec<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            default_page: default_page(),
            max_page_size: None,
            last_page_tokens: default_last_page_tokens(),
        }
    }
}

impl PaginationConfig {
    /// Whether `token` is a recognized last-page sentinel
    #[must_use]
    pub fn is_last_page_token(&self, token: &str) -> bool {
        self.last_page_tokens.iter().any(|t| t == token)
    }
}

fn default_page_size() -> u64 {
    15
}

fn default_page() -> u64 {
    1
}

fn default_last_page_tokens() -> Vec<String> {
    vec!["last".to_string()]
}

fn default_lookup_field() -> String {
    "id".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ApiConfig {
    /// Load configuration from `./crudkit.toml` and `CRUDKIT_`-prefixed
    /// environment variables, on top of the defaults
    pub fn load() -> Result<Self> {
        Self::load_from("crudkit.toml")
    }

    /// Load configuration from a specific file
    ///
    /// Useful for testing or non-standard deployments. Environment
    /// variables still take precedence over the file.
    pub fn load_from(path: &str) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(ApiConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("CRUDKIT_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.pagination.default_page_size, 15);
        assert_eq!(config.pagination.default_page, 1);
        assert_eq!(config.pagination.max_page_size, None);
        assert_eq!(config.lookup_field, "id");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_last_page_token_recognition() {
        let config = PaginationConfig::default();
        assert!(config.is_last_page_token("last"));
        assert!(!config.is_last_page_token("final"));
        assert!(!config.is_last_page_token("LAST"));
    }

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let config = ApiConfig::load_from("/nonexistent/crudkit.toml").unwrap();
        assert_eq!(config.pagination.default_page_size, 15);
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = std::env::temp_dir().join(format!("crudkit-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("crudkit.toml");
        std::fs::write(
            &path,
            "lookup_field = \"pk\"\n\n[pagination]\ndefault_page_size = 25\nlast_page_tokens = [\"last\", \"end\"]\n",
        )
        .unwrap();

        let config = ApiConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.pagination.default_page_size, 25);
        assert!(config.pagination.is_last_page_token("end"));
        assert_eq!(config.lookup_field, "pk");
        // Untouched keys keep their defaults.
        assert_eq!(config.pagination.default_page, 1);

        std::fs::remove_dir_all(&dir).ok();
    }
}
