//! # Storefront Configuration
//!
//! Where the backend lives and how prices are labelled.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     --api-url, --cdn-url, --timeout                                    │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     LAREK_API_URL, LAREK_CDN_URL, LAREK_API_TIMEOUT                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! base_url = "https://larek-api.nomoreparties.co/api/weblarek"
//! cdn_url = "https://larek-api.nomoreparties.co/content/weblarek"
//! timeout_secs = 10
//!
//! [ui]
//! currency_label = "synapses"
//! ```

use larek_api::{parse_http_url, ApiConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::ConfigError;

// =============================================================================
// API Settings
// =============================================================================

/// Backend location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// API root; `/product` and `/order` are appended.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Image root; catalog image paths are appended.
    #[serde(default = "default_cdn_url")]
    pub cdn_url: String,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://larek-api.nomoreparties.co/api/weblarek".to_string()
}

fn default_cdn_url() -> String {
    "https://larek-api.nomoreparties.co/content/weblarek".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            cdn_url: default_cdn_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// UI Settings
// =============================================================================

/// Rendering preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Word printed after every amount.
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

fn default_currency_label() -> String {
    "synapses".to_string()
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            currency_label: default_currency_label(),
        }
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Values given on the command line. `None` keeps the lower layer's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub cdn_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, command line and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    /// 4. Command-line overrides
    pub fn load(
        config_path: Option<PathBuf>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// Parses a `storefront.toml` document.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.cdn_url", &self.api.cdn_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingUrl(field));
            }
            parse_http_url(value).map_err(|e| ConfigError::InvalidUrl {
                field,
                message: e.to_string(),
            })?;
        }

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.ui.currency_label.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "ui.currency_label must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides read through `var`.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("LAREK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = var("LAREK_CDN_URL") {
            debug!(url = %url, "Overriding CDN URL from environment");
            self.api.cdn_url = url;
        }

        if let Some(timeout) = var("LAREK_API_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric LAREK_API_TIMEOUT"),
            }
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(url) = &overrides.cdn_url {
            self.api.cdn_url = url.clone();
        }
        if let Some(secs) = overrides.timeout_secs {
            self.api.timeout_secs = secs;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "weblarek", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    /// Settings for [`larek_api::LarekClient`].
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api.base_url.clone(),
            cdn_url: self.api.cdn_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn currency_label(&self) -> &str {
        &self.ui.currency_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.currency_label(), "synapses");
        assert_eq!(config.api_config().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = StorefrontConfig::from_toml(
            r#"
            [api]
            base_url = "http://localhost:3000/api/weblarek"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:3000/api/weblarek");
        assert_eq!(config.api.cdn_url, default_cdn_url());
        assert_eq!(config.ui, UiSettings::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let result = StorefrontConfig::from_toml("[api]\ntimeout_secs = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_then_cli_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LAREK_API_URL", "http://env.test/api"),
            ("LAREK_CDN_URL", "http://env.test/cdn"),
            ("LAREK_API_TIMEOUT", "not-a-number"),
        ]);

        let mut config = StorefrontConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));
        config.apply_overrides(&ConfigOverrides {
            api_url: Some("http://cli.test/api".to_string()),
            cdn_url: None,
            timeout_secs: Some(3),
        });

        assert_eq!(config.api.base_url, "http://cli.test/api");
        assert_eq!(config.api.cdn_url, "http://env.test/cdn");
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StorefrontConfig::default();
        config.api.base_url = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingUrl("api.base_url"))
        ));

        let mut config = StorefrontConfig::default();
        config.api.cdn_url = "ftp://files.test".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { field: "api.cdn_url", .. })
        ));

        let mut config = StorefrontConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let path = std::env::temp_dir().join(format!("storefront-{}.toml", std::process::id()));
        std::fs::write(&path, "[ui]\ncurrency_label = \"syn\"\n").unwrap();

        let config = StorefrontConfig::load(
            Some(path.clone()),
            &ConfigOverrides {
                api_url: Some("http://127.0.0.1:1/api".to_string()),
                ..ConfigOverrides::default()
            },
        )
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.currency_label(), "syn");
        assert_eq!(config.api.base_url, "http://127.0.0.1:1/api");
    }
}
