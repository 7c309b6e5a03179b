//! Service configuration.
//!
//! Configuration is read once at startup, either from a TOML file (when
//! `CAPACITY_CONFIG` points at one) or from environment variables, and then
//! passed explicitly to the issue-source client and the HTTP state.
//!
//! # Environment Variables
//! - `HOST` (default `0.0.0.0`), `PORT` (default `8080`)
//! - `MAX_UPLOAD_BYTES` (default 20 MiB)
//! - `JIRA_BASE_URL` (optional; without it the server uses an empty in-memory source)
//! - `JIRA_USER`, `JIRA_API_TOKEN`, `JIRA_PROJECT`
//! - `JIRA_SPRINT_FIELD` (default `customfield_10020`)
//! - `JIRA_PAGE_SIZE` (default 100), `JIRA_TIMEOUT_SECONDS` (default 30)
//! - `BASELINE_DIR` (default `data/baselines`)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming a TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "CAPACITY_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Connection settings for the Jira issue source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    /// Account used for basic auth; without it the token is sent as a bearer token
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    /// Restricts sprint queries to one project key
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default = "default_sprint_field")]
    pub sprint_field: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user: None,
            api_token: None,
            project: None,
            sprint_field: default_sprint_field(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_baseline_dir")]
    pub baseline_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            baseline_dir: default_baseline_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_sprint_field() -> String {
    "customfield_10020".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_baseline_dir() -> PathBuf {
    PathBuf::from("data/baselines")
}

impl AppConfig {
    /// Load from the file named by `CAPACITY_CONFIG`, or from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Self::from_env(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = AppConfig::default();

        if let Some(host) = get("HOST") {
            config.server.host = host;
        }
        if let Some(port) = get("PORT") {
            config.server.port = parse_value("PORT", &port)?;
        }
        if let Some(limit) = get("MAX_UPLOAD_BYTES") {
            config.server.max_upload_bytes = parse_value("MAX_UPLOAD_BYTES", &limit)?;
        }

        config.jira.base_url = get("JIRA_BASE_URL");
        config.jira.user = get("JIRA_USER");
        config.jira.api_token = get("JIRA_API_TOKEN");
        config.jira.project = get("JIRA_PROJECT");
        if let Some(field) = get("JIRA_SPRINT_FIELD") {
            config.jira.sprint_field = field;
        }
        if let Some(size) = get("JIRA_PAGE_SIZE") {
            config.jira.page_size = parse_value("JIRA_PAGE_SIZE", &size)?;
        }
        if let Some(timeout) = get("JIRA_TIMEOUT_SECONDS") {
            config.jira.timeout_seconds = parse_value("JIRA_TIMEOUT_SECONDS", &timeout)?;
        }

        if let Some(dir) = get("BASELINE_DIR") {
            config.storage.baseline_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jira.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "jira.page_size".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.jira.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "jira.timeout_seconds".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if let Some(url) = &self.jira.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    key: "jira.base_url".to_string(),
                    message: format!("'{}' is not an http(s) URL", url),
                });
            }
        }
        Ok(())
    }

    /// Socket address string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
