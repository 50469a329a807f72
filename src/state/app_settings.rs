use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    /// cricapi.com key. CRICTUI_API_KEY wins over the settings file; the
    /// overlay runs simulation-only without one.
    pub api_key: Option<String>,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    api_key: Option<String>,
}

impl AppSettings {
    pub fn load() -> Self {
        let file = read_settings_file().unwrap_or_default();
        let api_key = std::env::var("CRICTUI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or(file.api_key);

        Self { api_key, full_screen: false, log_level: None }
    }

    pub fn save(&self) -> Result<(), String> {
        let path = settings_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let payload = serde_json::to_string_pretty(&SettingsFile {
            api_key: self.api_key.clone(),
        })
        .map_err(|e| format!("serialize settings failed: {e}"))?;
        std::fs::write(&path, payload).map_err(|e| format!("write settings failed: {e}"))?;
        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

fn read_settings_file() -> Result<SettingsFile, String> {
    let content = std::fs::read_to_string(settings_path())
        .map_err(|e| format!("read settings failed: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("parse settings failed: {e}"))
}

fn settings_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("crictui").join("settings.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("crictui")
            .join("settings.json");
    }
    PathBuf::from("settings.json")
}
