//! # Console configuration — `console.toml`
//!
//! The console has few knobs: which backend to use, where the REST backend
//! lives, and how long the placeholder login pretends to think.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8080/api"
//! backend = "rest"        # or "memory" for an offline demo
//!
//! [login]
//! delay_ms = 1000
//! ```
//!
//! Every section is `#[serde(default)]`, so a missing or empty file is the
//! default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `console.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub login: LoginConfig,
}

/// Which backend the console talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// The REST backend at `base_url`.
    #[default]
    Rest,
    /// An in-process backend that forgets everything on reload.
    Memory,
}

/// REST backend location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base address every resource path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub backend: BackendMode,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            backend: BackendMode::default(),
        }
    }
}

/// Placeholder login gate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Simulated server round-trip before the credential check answers.
    #[serde(default = "default_login_delay")]
    pub delay_ms: u64,
}

fn default_login_delay() -> u64 {
    1000
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_login_delay(),
        }
    }
}

impl ConsoleConfig {
    /// Create a config pointing at a specific backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.into(),
                backend: BackendMode::Rest,
            },
            login: LoginConfig::default(),
        }
    }

    /// Builder method to pick the backend.
    pub fn with_backend(mut self, backend: BackendMode) -> Self {
        self.api.backend = backend;
        self
    }

    /// Builder method to set the login delay.
    pub fn with_login_delay(mut self, ms: u64) -> Self {
        self.login.delay_ms = ms;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "console.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = ConsoleConfig::from_toml("").unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.login.delay_ms, 1000);
        assert_eq!(config.api.backend, BackendMode::Rest);
    }

    #[test]
    fn test_memory_backend_mode() {
        let config = ConsoleConfig::from_toml("[api]\nbackend = \"memory\"\n").unwrap();
        assert_eq!(config.api.backend, BackendMode::Memory);
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config =
            ConsoleConfig::from_toml("[api]\nbase_url = \"https://crm.example/api\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://crm.example/api");
        assert_eq!(config.login.delay_ms, 1000);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ConsoleConfig::new("http://10.0.0.2:9000/api").with_login_delay(0);
        let text = config.to_toml().unwrap();
        assert_eq!(ConsoleConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(ConsoleConfig::from_toml("[api\nbase_url = 3").is_err());
    }
}
