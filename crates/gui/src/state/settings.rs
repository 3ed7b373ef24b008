//! Client settings

use serde::{Deserialize, Serialize};

const DEFAULT_SERVER_URL: &str = "http://localhost:3001";

/// Environment variable overriding the configured server URL
pub const SERVER_URL_ENV: &str = "STLVIEW_SERVER";

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    /// Use English UI text instead of Russian
    #[serde(default = "default_english")]
    pub english: bool,
}

fn default_english() -> bool {
    true
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            english: true,
        }
    }
}

/// All client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Base URL of the catalog server
    pub server_url: String,
    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            ui: UiSettings::default(),
        }
    }
}

impl ClientSettings {
    /// Load settings from file (or defaults), then apply the env override
    pub fn load() -> Self {
        let mut settings = Self::load_file().unwrap_or_default();
        settings.apply_override(std::env::var(SERVER_URL_ENV).ok());
        settings
    }

    fn load_file() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("com", "stlview", "stlview")?;
        let config_path = dirs.config_dir().join("settings.json");
        let json = std::fs::read_to_string(&config_path).ok()?;
        match serde_json::from_str(&json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
                None
            }
        }
    }

    fn apply_override(&mut self, server_url: Option<String>) {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url;
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = directories::ProjectDirs::from("com", "stlview", "stlview") {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                if let Ok(json) = serde_json::to_string_pretty(self) {
                    if let Err(e) = std::fs::write(&config_path, json) {
                        tracing::warn!("Failed to save settings: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = ClientSettings::default();
        assert_eq!(s.server_url, "http://localhost:3001");
        assert_eq!(s.ui.font_size, 14.0);
    }

    #[test]
    fn test_env_override() {
        let mut s = ClientSettings::default();
        s.apply_override(Some("http://catalog.lan:9000".into()));
        assert_eq!(s.server_url, "http://catalog.lan:9000");

        s.apply_override(Some("   ".into()));
        s.apply_override(None);
        assert_eq!(s.server_url, "http://catalog.lan:9000");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let s: ClientSettings =
            serde_json::from_str(r#"{"server_url":"http://x:1"}"#).unwrap();
        assert_eq!(s.server_url, "http://x:1");
        assert_eq!(s.ui, UiSettings::default());
    }
}
