//! Publisher configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/bitspring/bitspring.toml`
//! - Windows: `%APPDATA%/bitspring/bitspring.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use bitspring_protocol::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_WEB_APP_BASE_URL,
};
use bitspring_publish::PublishConfig;
use bitspring_publish::orchestrator::{DEFAULT_CONVERSION_TIMEOUT, DEFAULT_WORKSPACE_DIR};
use serde::{Deserialize, Serialize};

/// Publisher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Root of the BitSpring REST API.
    pub api_base_url: String,

    /// Root of the web app serving shared spaces.
    pub web_app_base_url: String,

    /// Timeout for each API request, in seconds.
    pub request_timeout_secs: u64,

    /// How long to wait for the renderer, in seconds.
    pub conversion_timeout_secs: u64,

    /// Directory under the system temp dir for per-upload workspaces.
    pub workspace_dir: String,

    /// Open the finished space in the default browser.
    pub open_browser: bool,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            web_app_base_url: DEFAULT_WEB_APP_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            conversion_timeout_secs: DEFAULT_CONVERSION_TIMEOUT.as_secs(),
            workspace_dir: DEFAULT_WORKSPACE_DIR.into(),
            open_browser: true,
        }
    }
}

impl PublisherConfig {
    /// Loads configuration from `path` (or the platform default), creating
    /// the file with defaults if it does not exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: PublisherConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = PublisherConfig::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Workflow settings derived from this file.
    pub fn publish_config(&self) -> PublishConfig {
        PublishConfig {
            web_app_base_url: self.web_app_base_url.clone(),
            workspace_dir: self.workspace_dir.clone(),
            conversion_timeout: Duration::from_secs(self.conversion_timeout_secs),
            open_browser: self.open_browser,
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("bitspring")
            .join("bitspring.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("bitspring").join("bitspring.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/bitspring/bitspring.toml"))
    }
}
