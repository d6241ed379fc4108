//! Client configuration
//!
//! `ClientConfig` is read from a YAML file, then overridden by environment
//! variables, then validated before a client is built from it.
//!
//! ```yaml
//! api_key: key...
//! base: appXXXXXXXXXXXXXX
//! timeout_secs: 30
//! retry:
//!   max_retries: 5
//!   delay_ms: 1000
//! throttle:
//!   requests_per_second: 5
//! ```

use crate::error::{Error, Result};
use crate::http::{RateLimiterConfig, RetryPolicy, DEFAULT_API_URL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "AIRTABLE_API_KEY";
/// Environment variable holding the client secret
pub const ENV_CLIENT_SECRET: &str = "AIRTABLE_CLIENT_SECRET";
/// Environment variable holding the base id
pub const ENV_BASE: &str = "AIRTABLE_BASE";
/// Environment variable overriding the API root
pub const ENV_API_URL: &str = "AIRTABLE_API_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Everything needed to build an `Airtable` client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Personal access token or API key
    #[serde(default)]
    pub api_key: String,

    /// Optional value for the client secret header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Base id the client operates on
    #[serde(default)]
    pub base: String,

    /// API root
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-attempt request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// 429 retry policy
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Optional client-side throttle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<RateLimiterConfig>,

    /// Dump request headers and bodies at debug level
    #[serde(default)]
    pub debug: bool,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("airtable-cdk/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            client_secret: None,
            base: String::new(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            retry: RetryPolicy::default(),
            throttle: None,
            debug: false,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, then apply the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Override fields from a variable lookup; empty values are ignored
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = key;
        }
        if let Some(secret) = get(ENV_CLIENT_SECRET) {
            self.client_secret = Some(secret);
        }
        if let Some(base) = get(ENV_BASE) {
            self.base = base;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
    }

    /// Check that the required fields are present
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::config(format!(
                "api_key is required (set it in the config file or {ENV_API_KEY})"
            )));
        }
        if self.base.trim().is_empty() {
            return Err(Error::config(format!(
                "base is required (set it in the config file or {ENV_BASE})"
            )));
        }
        if self.api_url.trim().is_empty() {
            return Err(Error::config("api_url cannot be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `ClientConfig`
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    #[must_use]
    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.client_secret = Some(secret.into());
        self
    }

    #[must_use]
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.config.base = base.into();
        self
    }

    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.retry.max_retries = retries;
        self
    }

    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry.delay = delay;
        self
    }

    #[must_use]
    pub fn throttle(mut self, throttle: RateLimiterConfig) -> Self {
        self.config.throttle = Some(throttle);
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
