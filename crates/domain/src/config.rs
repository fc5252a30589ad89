//! Application configuration
//!
//! A [`Config`] value is built once at startup (file, environment, CLI
//! flags) and then handed by reference to every component constructor. It is
//! never mutated after validation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    DEFAULT_AUDIENCE, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_MAX_ATTEMPTS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TRANSPORT_DELAY_MS, DEFAULT_TRANSPORT_MAX_ATTEMPTS,
    DEFAULT_UPLOAD_FILE,
};
use crate::errors::ConfigError;
use crate::types::Credentials;

/// Configuration for a ScanBridge run.
///
/// JSON keys match the `config.json` files written by `--save`. The
/// `wiz`-prefixed credential and endpoint keys of older files are accepted
/// on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, alias = "wizClientId")]
    pub client_id: String,
    #[serde(default, alias = "wizClientSecret")]
    pub client_secret: String,
    #[serde(default, alias = "wizAuthUrl")]
    pub auth_url: String,
    #[serde(default, alias = "wizQueryUrl")]
    pub query_url: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default)]
    pub scan_subscription_id: String,
    #[serde(default)]
    pub scan_cloud_type: String,
    #[serde(default)]
    pub scan_provider_id: String,
    /// Local scan-result file that gets uploaded.
    #[serde(default = "default_upload_file")]
    pub upload_file: String,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub poll: PollSettings,
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_upload_file() -> String {
    DEFAULT_UPLOAD_FILE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            auth_url: String::new(),
            query_url: String::new(),
            audience: default_audience(),
            scan_subscription_id: String::new(),
            scan_cloud_type: String::new(),
            scan_provider_id: String::new(),
            upload_file: default_upload_file(),
            retry: RetrySettings::default(),
            poll: PollSettings::default(),
        }
    }
}

impl Config {
    /// Check the configuration before any network call is made.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for empty credentials, malformed endpoint URLs
    /// or a zero attempt budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::Missing("clientId"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::Missing("clientSecret"));
        }
        validate_url("authUrl", &self.auth_url)?;
        validate_url("queryUrl", &self.query_url)?;
        if self.upload_file.trim().is_empty() {
            return Err(ConfigError::Missing("uploadFile"));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.maxAttempts must be at least 1".into()));
        }
        if self.poll.max_attempts == 0 {
            return Err(ConfigError::Invalid("poll.maxAttempts must be at least 1".into()));
        }
        Ok(())
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.clone(), self.client_secret.clone())
    }

    /// Whether enough scan metadata is present to look the host up in the
    /// resource graph.
    #[must_use]
    pub fn has_resource_filter(&self) -> bool {
        !self.scan_cloud_type.is_empty() && !self.scan_provider_id.is_empty()
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing(field));
    }
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl { field, message: e.to_string() })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            field,
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Transport retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_TRANSPORT_MAX_ATTEMPTS,
            delay_ms: DEFAULT_TRANSPORT_DELAY_MS,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RetrySettings {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Activity polling budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_POLL_MAX_ATTEMPTS, interval_secs: DEFAULT_POLL_INTERVAL_SECS }
    }
}

impl PollSettings {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
