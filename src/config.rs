use crate::core::settings_sync::SettingsSync;
use crate::models::config::AppConfig;
use crate::models::error::SError;
use crate::models::graphics::GraphicsSettings;
use crate::utils::json::Json;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

pub type SharedConfig = Arc<Mutex<ConfigStore>>;

/// Owns `config.json`. Reads happen only through [`ConfigStore::load`];
/// callers decide when the cached copy is stale.
pub struct ConfigStore {
    path: Utf8PathBuf,
    cached: Option<AppConfig>,
}

impl ConfigStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn shared(path: impl Into<Utf8PathBuf>) -> SharedConfig {
        Arc::new(Mutex::new(Self::new(path)))
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Rereads the document from disk. A missing file yields defaults;
    /// a corrupt one is logged and replaced by defaults in memory.
    pub fn load(&mut self) -> &AppConfig {
        let config = if self.path.exists() {
            Json::read::<AppConfig>(&self.path).unwrap_or_else(|e| {
                warn!("{} is corrupted ({}). Using defaults.", self.path, e);
                AppConfig::default()
            })
        } else {
            AppConfig::default()
        };

        self.cached.insert(config)
    }

    /// The cached document, loading it on first access.
    pub fn current(&mut self) -> &AppConfig {
        if self.cached.is_none() {
            self.load();
        }
        self.cached.get_or_insert_with(AppConfig::default)
    }

    pub fn save(&mut self, config: AppConfig) -> Result<(), SError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Json::write(&self.path, &config)?;
        self.cached = Some(config);
        Ok(())
    }

    /// Reloads, applies `f` and writes the result back.
    pub fn update<F>(&mut self, f: F) -> Result<AppConfig, SError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.load().clone();
        f(&mut config);
        self.save(config.clone())?;
        Ok(config)
    }

    /// Cached graphics settings, seeded from the live settings files on first use.
    pub fn graphics_settings(&mut self, sync: &SettingsSync) -> Result<GraphicsSettings, SError> {
        if let Some(settings) = self.load().graphics_settings.clone() {
            return Ok(settings);
        }

        info!("No cached graphics settings; reading defaults from disk");
        let settings = sync.load_defaults();
        let seeded = settings.clone();
        self.update(move |c| c.graphics_settings = Some(seeded))?;
        Ok(settings)
    }

    pub fn save_graphics_settings(
        &mut self,
        settings: GraphicsSettings,
        ui_settings: Option<BTreeMap<String, Value>>,
    ) -> Result<(), SError> {
        self.update(move |c| {
            if let Some(ui) = ui_settings {
                c.ui_settings = ui;
            }
            c.graphics_settings = Some(settings);
        })
        .map(|_| ())
    }
}
