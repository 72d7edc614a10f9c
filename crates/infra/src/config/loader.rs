//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `BASALAM_ENVIRONMENT` is not set, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `BASALAM_ENVIRONMENT`: `production` or `development` (required)
//! - `BASALAM_TOKEN_URL`: Token endpoint override
//! - `BASALAM_AUTHORIZE_URL`: Authorization page override
//! - `BASALAM_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `BASALAM_USER_AGENT`: User agent sent with every request
//! - `BASALAM_<SERVICE>_URL`: Host override for one service, e.g.
//!   `BASALAM_WALLET_URL` or `BASALAM_ORDER_PROCESSING_URL`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./basalam.toml` or `./basalam.json` (current working directory)
//! 2. `../basalam.toml` or `../basalam.json` (parent directory)
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use basalam_domain::{BasalamConfig, BasalamError, Environment, Result, Service};

const FILE_NAMES: [&str; 2] = ["basalam.toml", "basalam.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BasalamError::Config` if configuration cannot be loaded from
/// either source, or is invalid.
pub fn load() -> Result<BasalamConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!(
                environment = %config.environment,
                "Configuration loaded from environment variables"
            );
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `BASALAM_ENVIRONMENT` selects the defaults; the other variables override
/// individual settings.
///
/// # Errors
/// Returns `BasalamError::Config` if `BASALAM_ENVIRONMENT` is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<BasalamConfig> {
    let environment = Environment::from_str(&env_var("BASALAM_ENVIRONMENT")?)
        .map_err(BasalamError::Config)?;
    let mut config = BasalamConfig::for_environment(environment);

    if let Some(url) = optional_env("BASALAM_TOKEN_URL") {
        config.token_url = url;
    }
    if let Some(url) = optional_env("BASALAM_AUTHORIZE_URL") {
        config.authorize_url = url;
    }
    if let Some(raw) = optional_env("BASALAM_TIMEOUT_SECS") {
        config.timeout_secs = raw
            .parse()
            .map_err(|e| BasalamError::Config(format!("Invalid BASALAM_TIMEOUT_SECS: {e}")))?;
    }
    if let Some(agent) = optional_env("BASALAM_USER_AGENT") {
        config.user_agent = agent;
    }
    for service in Service::ALL {
        if let Some(url) = optional_env(&service_var(service)) {
            config.services.insert(service, url);
        }
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Format is detected by file extension.
///
/// # Errors
/// Returns `BasalamError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<BasalamConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BasalamError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BasalamError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BasalamError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<BasalamConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BasalamError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BasalamError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BasalamError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
            dirs.push(exe_dir.join(".."));
        }
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// `BASALAM_ORDER_PROCESSING_URL` for `Service::OrderProcessing`.
fn service_var(service: Service) -> String {
    format!("BASALAM_{}_URL", service.to_string().replace('-', "_").to_uppercase())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| BasalamError::Config(format!("Missing required environment variable: {key}")))
}

/// Non-empty environment variable, if set.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
