//! Configuration management
//!
//! `settings.json` in the luna directory:
//! ```json
//! {
//!   "api": { "baseUrl": "http://localhost:8000/api", "timeoutSecs": 10 }
//! }
//! ```
//! Keys the client does not manage are kept as-is when saving.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment override for the backend URL
pub const API_URL_ENV: &str = "LUNA_API_URL";

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    api: ApiSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Luna configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn read_settings(luna_dir: &Path) -> Result<SettingsFile> {
    let settings_path = luna_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

impl Config {
    /// Load config from the luna directory
    ///
    /// `LUNA_API_URL` overrides the saved base URL.
    pub fn load(luna_dir: &Path) -> Result<Self> {
        let raw = read_settings(luna_dir)?;

        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or(raw.api.base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = raw
            .api
            .timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Save managed fields, preserving everything else in settings.json
    pub fn save(&self, luna_dir: &Path) -> Result<()> {
        let mut settings = read_settings(luna_dir)?;

        settings.api.base_url = Some(self.api_url.clone());
        settings.api.timeout_secs = Some(self.timeout.as_secs());

        let content = serde_json::to_string_pretty(&settings)?;
        let settings_path = luna_dir.join(SETTINGS_FILE);
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}
