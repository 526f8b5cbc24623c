//! Settings resolution.
//!
//! Precedence for each value: explicit override (CLI) → environment →
//! built-in default. With nothing set, a run needs only the token variable.

use crate::{
    DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_ENV, DEFAULT_WINDOW_SECS,
    DIRECTORY_FILE, ENV_DATA_DIR, ENV_ENDPOINT, TIMELINE_FILE,
};
use fc_common::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Values supplied explicitly, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub data_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    pub endpoint: String,
    pub data_dir: PathBuf,
    pub timeout_secs: u64,
    pub window_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            data_dir: PathBuf::from("data"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

impl Settings {
    pub fn timeline_path(&self) -> PathBuf {
        self.data_dir.join(TIMELINE_FILE)
    }

    pub fn directory_path(&self) -> PathBuf {
        self.data_dir.join(DIRECTORY_FILE)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Request URL including the full-list query parameters.
    pub fn request_url(&self) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{}count=0&include_down=false", self.endpoint, sep)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Resolve settings against the process environment.
pub fn resolve_settings(overrides: &SettingsOverrides) -> Result<Settings> {
    resolve_settings_with(overrides, |key| std::env::var(key).ok())
}

/// Resolve settings through an arbitrary variable lookup.
pub fn resolve_settings_with<F>(overrides: &SettingsOverrides, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();

    if let Some(dir) = overrides.data_dir.clone() {
        settings.data_dir = dir;
    } else if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
        settings.data_dir = PathBuf::from(dir.trim());
    }

    if let Some(endpoint) = overrides.endpoint.clone() {
        settings.endpoint = endpoint;
    } else if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
        settings.endpoint = endpoint.trim().to_string();
    }

    if !settings.endpoint.starts_with("http://") && !settings.endpoint.starts_with("https://") {
        return Err(Error::Config(format!(
            "endpoint must be an http(s) URL, got {:?}",
            settings.endpoint
        )));
    }

    debug!(
        data_dir = %settings.data_dir.display(),
        endpoint = %settings.endpoint,
        "settings resolved"
    );
    Ok(settings)
}
