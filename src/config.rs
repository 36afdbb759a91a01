//! Configuration handling for the toolkit

use anyhow::{Context, Result};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::DEFAULT_PROBE_TIMEOUT;

/// Account accepted when none is configured
const DEFAULT_USERNAME: &str = "admin@guukstudio.com";
const DEFAULT_PASSWORD: &str = "guuk";

/// User configuration, read from `config.json` in the platform config dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolkitConfig {
    /// Script endpoint that receives submissions
    pub submit_endpoint: Option<String>,
    /// Account email accepted at login
    pub username: Option<String>,
    /// Account password accepted at login
    pub password: Option<String>,
    /// Treat the device as offline regardless of the probe
    pub force_offline: Option<bool>,
    /// JSON schema file replacing the built-in sector forms
    pub schema_path: Option<PathBuf>,
    /// Where the pending queue, session and log live
    pub data_dir: Option<PathBuf>,
    /// Connectivity probe timeout
    pub probe_timeout_ms: Option<u64>,
}

impl ToolkitConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "guukstudio", "mne-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: ToolkitConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Apply `MNE_*` overrides using the given variable lookup
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup("MNE_SUBMIT_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.submit_endpoint = Some(endpoint);
        }
        if let Some(flag) = lookup("MNE_FORCE_OFFLINE").and_then(|v| parse_flag(&v)) {
            self.force_offline = Some(flag);
        }
        if let Some(dir) = lookup("MNE_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Parsed submission endpoint, `None` when not configured
    pub fn endpoint(&self) -> Result<Option<Url>> {
        self.submit_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| Url::parse(s).with_context(|| format!("Invalid submit endpoint {s:?}")))
            .transpose()
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or(DEFAULT_USERNAME)
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or(DEFAULT_PASSWORD)
    }

    pub fn force_offline(&self) -> bool {
        self.force_offline.unwrap_or(false)
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }

    /// Configured data dir, or the platform data dir
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("Could not determine a data directory; set data_dir or MNE_DATA_DIR")
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
