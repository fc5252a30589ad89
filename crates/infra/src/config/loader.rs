//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `SCANBRIDGE_CLIENT_ID`: OAuth client id
//! - `SCANBRIDGE_CLIENT_SECRET`: OAuth client secret
//! - `SCANBRIDGE_AUTH_URL`: Token endpoint
//! - `SCANBRIDGE_QUERY_URL`: GraphQL endpoint
//!
//! Optional:
//! - `SCANBRIDGE_AUDIENCE`: Token audience (default `wiz-api`)
//! - `SCANBRIDGE_UPLOAD_FILE`: Scan result file to upload
//! - `SCANBRIDGE_SCAN_SUBSCRIPTION_ID`, `SCANBRIDGE_SCAN_CLOUD_TYPE`,
//!   `SCANBRIDGE_SCAN_PROVIDER_ID`: Scanned host metadata
//! - `SCANBRIDGE_RETRY_MAX_ATTEMPTS`, `SCANBRIDGE_RETRY_DELAY_MS`,
//!   `SCANBRIDGE_REQUEST_TIMEOUT_SECS`: Transport retry budget
//! - `SCANBRIDGE_POLL_MAX_ATTEMPTS`, `SCANBRIDGE_POLL_INTERVAL_SECS`: Poll
//!   budget
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./scanbridge.json` or `./scanbridge.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use scanbridge_domain::{Config, ConfigError};

type Result<T> = std::result::Result<T, ConfigError>;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from `path` or, when `path`
/// is `None`, from the first config file found by [`probe_config_paths`].
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(path)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Errors
/// Returns [`ConfigError`] if required variables are missing or numeric
/// variables do not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config {
        client_id: env_var("SCANBRIDGE_CLIENT_ID")?,
        client_secret: env_var("SCANBRIDGE_CLIENT_SECRET")?,
        auth_url: env_var("SCANBRIDGE_AUTH_URL")?,
        query_url: env_var("SCANBRIDGE_QUERY_URL")?,
        ..Config::default()
    };

    if let Some(audience) = env_opt("SCANBRIDGE_AUDIENCE") {
        config.audience = audience;
    }
    if let Some(upload_file) = env_opt("SCANBRIDGE_UPLOAD_FILE") {
        config.upload_file = upload_file;
    }
    if let Some(subscription) = env_opt("SCANBRIDGE_SCAN_SUBSCRIPTION_ID") {
        config.scan_subscription_id = subscription;
    }
    if let Some(cloud_type) = env_opt("SCANBRIDGE_SCAN_CLOUD_TYPE") {
        config.scan_cloud_type = cloud_type;
    }
    if let Some(provider_id) = env_opt("SCANBRIDGE_SCAN_PROVIDER_ID") {
        config.scan_provider_id = provider_id;
    }

    if let Some(attempts) = env_parse("SCANBRIDGE_RETRY_MAX_ATTEMPTS")? {
        config.retry.max_attempts = attempts;
    }
    if let Some(delay_ms) = env_parse("SCANBRIDGE_RETRY_DELAY_MS")? {
        config.retry.delay_ms = delay_ms;
    }
    if let Some(timeout_secs) = env_parse("SCANBRIDGE_REQUEST_TIMEOUT_SECS")? {
        config.retry.timeout_secs = timeout_secs;
    }
    if let Some(attempts) = env_parse("SCANBRIDGE_POLL_MAX_ATTEMPTS")? {
        config.poll.max_attempts = attempts;
    }
    if let Some(interval) = env_parse("SCANBRIDGE_POLL_INTERVAL_SECS")? {
        config.poll.interval_secs = interval;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns [`ConfigError`] if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ConfigError::Io(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ConfigError::Io("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ConfigError::Io(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Write `config` to `path`, as TOML for `.toml` files and pretty JSON
/// otherwise.
///
/// # Errors
/// Returns [`ConfigError::Io`] if the file cannot be written.
pub fn save_to_file(config: &Config, path: &Path) -> Result<()> {
    let contents = match extension(path) {
        "toml" => toml::to_string_pretty(config)
            .map_err(|e| ConfigError::Parse(format!("Failed to encode TOML: {}", e)))?,
        _ => serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::Parse(format!("Failed to encode JSON: {}", e)))?,
    };

    std::fs::write(path, contents)
        .map_err(|e| ConfigError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    tracing::info!(path = %path.display(), "Configuration saved");
    Ok(())
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    match extension(path) {
        "toml" => toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ConfigError::Parse(format!("Invalid JSON format: {}", e))),
        other => Err(ConfigError::Parse(format!("Unsupported config format: {}", other))),
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("json")
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 4] = ["config.json", "config.toml", "scanbridge.json", "scanbridge.toml"];

    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &'static str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        ConfigError::Invalid(format!("Missing required environment variable: {}", key))
    })
}

/// Get optional environment variable, treating empty values as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::Parse(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}
