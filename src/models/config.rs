use crate::models::graphics::GraphicsSettings;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_MENU_TITLE: &str = "Valorant";

/// The persisted `config.json` document. Missing fields fall back to defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: Option<Utf8PathBuf>,
    pub title: String,
    pub menu_icon_path: String,
    pub ordered_accounts: Vec<String>,
    pub riot_client_exe_path: Option<Utf8PathBuf>,
    pub ui_settings: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphics_settings: Option<GraphicsSettings>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            title: DEFAULT_MENU_TITLE.to_string(),
            menu_icon_path: String::new(),
            ordered_accounts: Vec::new(),
            riot_client_exe_path: None,
            ui_settings: BTreeMap::from([("show_game_icons".to_string(), Value::Bool(true))]),
            graphics_settings: None,
        }
    }
}

impl AppConfig {
    /// The configured export directory, ignoring empty strings left by older versions.
    pub fn output_dir(&self) -> Option<&Utf8PathBuf> {
        self.output_dir.as_ref().filter(|p| !p.as_str().is_empty())
    }

    pub fn show_game_icons(&self) -> bool {
        self.ui_settings
            .get("show_game_icons")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

/// Settings passed to an explicit menu export.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MenuExportSettings {
    pub output_dir: Utf8PathBuf,
    pub title: String,
    pub ordered_accounts: Vec<String>,
    pub menu_icon_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"title": "Mine", "output_dir": ""}"#).unwrap();
        assert_eq!(config.title, "Mine");
        assert!(config.output_dir().is_none());
        assert!(config.show_game_icons());
        assert!(config.graphics_settings.is_none());
    }

    #[test]
    fn game_icons_can_be_hidden() {
        let config: AppConfig =
            serde_json::from_str(r#"{"ui_settings": {"show_game_icons": false}}"#).unwrap();
        assert!(!config.show_game_icons());
    }
}
