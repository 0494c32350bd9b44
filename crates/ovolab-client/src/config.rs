//! Client configuration.
//!
//! The configuration file is TOML. Its location is resolved in order:
//!
//! 1. an explicit path (the CLI `--config` flag)
//! 2. the `OVOLAB_CONFIG` environment variable
//! 3. `<config dir>/ovolab/config.toml`
//!
//! A missing file yields the defaults. `OVOLAB_API_URL` and
//! `OVOLAB_HEALTH_URL` override the file.
//!
//! ```toml
//! api_url = "https://lab.example.com/api/v1"
//! timeout_secs = 30
//! autosave_delay_ms = 3000
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "OVOLAB_CONFIG";
/// Environment variable overriding [`ClientConfig::api_url`].
pub const API_URL_ENV: &str = "OVOLAB_API_URL";
/// Environment variable overriding [`ClientConfig::health_url`].
pub const HEALTH_URL_ENV: &str = "OVOLAB_HEALTH_URL";

const PROJECT: &str = "ovolab";
const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
const API_PREFIX: &str = "/api/v1";

/// Settings for [`ApiClient`](crate::ApiClient) and the autosaver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the versioned API, e.g. `http://localhost:8000/api/v1`.
    pub api_url: String,
    /// Health endpoint; derived from `api_url` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_url: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Quiet period before a draft is autosaved.
    pub autosave_delay_ms: u64,
    /// Where the session token is stored; defaults under the data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            health_url: None,
            timeout_secs: 30,
            autosave_delay_ms: 3000,
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    /// Resolves the config file location. `None` if the platform has no
    /// config directory and nothing else was given.
    pub fn resolve_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join(PROJECT).join("config.toml"))
    }

    /// Loads the configuration and applies environment overrides.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut config = match Self::resolve_path(explicit) {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit.is_some() => {
                return Err(Error::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Reads one TOML file, without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Parses TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Applies `OVOLAB_API_URL` / `OVOLAB_HEALTH_URL` as returned by `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(url) = lookup(HEALTH_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.health_url = Some(url);
        }
    }

    /// The health endpoint: explicit, or `api_url` without `/api/v1` plus `/health`.
    pub fn health_url(&self) -> String {
        if let Some(url) = &self.health_url {
            return url.clone();
        }
        let base = self.api_url.trim_end_matches('/');
        let root = base.strip_suffix(API_PREFIX).unwrap_or(base);
        format!("{root}/health")
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Autosave quiet period.
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    /// The credentials file.
    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(PROJECT).join("session.json"))
                .ok_or_else(|| {
                    Error::config("Could not determine data directory for this platform")
                }),
        }
    }
}
