// SPDX-License-Identifier: MPL-2.0

use crate::config::{APP_ID, DEFAULT_PAGE_SIZE, DEFAULT_SERVER, SCROLL_QUIET_MS, SCROLL_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const SERVER_ENV: &str = "MURMUR_SERVER";

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server_url: String,
    /// Posts per page; constant for the session
    pub page_size: u32,
    pub scroll_quiet_ms: u64,
    pub scroll_threshold: f64,
    /// Username new posts are submitted as
    pub username: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            scroll_quiet_ms: SCROLL_QUIET_MS,
            scroll_threshold: SCROLL_THRESHOLD,
            username: None,
        }
    }
}

impl AppSettings {
    /// Get the settings file path (~/.config/io.github.murmur.Murmur/settings.json)
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push(APP_ID);
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            return Self::default();
        };

        let settings = match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        };

        settings.with_env_overrides()
    }

    fn parse(contents: &str) -> Self {
        serde_json::from_str::<Self>(contents)
            .unwrap_or_default()
            .normalized()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(server) = std::env::var(SERVER_ENV) {
            self.server_url = server;
        }
        self
    }

    /// A zero page size would never advance the cursor.
    fn normalized(mut self) -> Self {
        if self.page_size == 0 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }

    pub fn scroll_quiet(&self) -> Duration {
        Duration::from_millis(self.scroll_quiet_ms)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::settings_path().ok_or("Could not determine config directory")?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {e}"))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;

        std::fs::write(&path, json).map_err(|e| format!("Failed to write settings: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = AppSettings::parse(r#"{"server_url": "http://feed.local"}"#);
        assert_eq!(settings.server_url, "http://feed.local");
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.scroll_quiet(), Duration::from_millis(200));
    }

    #[test]
    fn test_zero_page_size_is_normalized() {
        let settings = AppSettings::parse(r#"{"page_size": 0}"#);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        assert_eq!(AppSettings::parse("{{{"), AppSettings::default());
    }
}
