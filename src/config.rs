/// Application settings
///
/// Loaded from `settings.json` in the user's config directory:
/// - Linux: ~/.config/image-gallery/settings.json
/// - macOS: ~/Library/Application Support/image-gallery/settings.json
/// - Windows: %APPDATA%\image-gallery\settings.json
///
/// Every field is optional. `IMAGE_GALLERY_API_URL` overrides the API base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

pub const API_URL_ENV: &str = "IMAGE_GALLERY_API_URL";
const DEFAULT_API_URL: &str = "http://localhost:4000";
const DEFAULT_NOTIFICATION_SECS: u64 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the image API; `/api/...` paths are appended to it
    pub api_base_url: String,
    /// How long a status banner stays up before hiding itself
    pub notification_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            notification_timeout_secs: DEFAULT_NOTIFICATION_SECS,
        }
    }
}

impl Settings {
    /// Load settings from disk and the environment, falling back to defaults.
    /// Problems are logged, never fatal.
    pub fn load() -> Self {
        let mut settings = match Self::settings_path() {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("⚠️  Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                settings.api_base_url = url.trim().to_string();
            }
        }

        if let Err(e) = settings.api_base() {
            warn!("⚠️  {}, using {}", e, DEFAULT_API_URL);
            settings.api_base_url = DEFAULT_API_URL.to_string();
        }

        info!("⚙️  Using image API at {}", settings.api_base_url);
        settings
    }

    /// Parse a settings file
    pub fn from_file(path: &Path) -> std::result::Result<Self, String> {
        let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_json(&json).map_err(|e| e.to_string())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The API base as a URL that paths can be appended to
    pub fn api_base(&self) -> Result<Url> {
        let url = Url::parse(&self.api_base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", self.api_base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(self.api_base_url.clone()));
        }
        Ok(url)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    fn settings_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("image-gallery");
        path.push("settings.json");
        Some(path)
    }
}
