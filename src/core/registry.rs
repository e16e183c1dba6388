// src/core/registry.rs
use crate::config::{ConfigStore, SharedConfig};
use crate::core::archive::{backup_file_name, ProfileArchive, ZipProfileArchive};
use crate::core::client::ClientLocator;
use crate::core::linker::{DirectoryLink, JunctionLink};
use crate::core::menu_exporter::MenuExporter;
use crate::core::profile_store::ProfileStore;
use crate::core::settings_sync::SettingsSync;
use crate::core::switcher::{SessionSwitcher, SwitchEnv};
use crate::models::config::MenuExportSettings;
use crate::models::error::SError;
use crate::models::graphics::GraphicsSettings;
use crate::models::paths::{default_base_dir, local_app_data, AppPaths, RiotPathRules};
use crate::utils::privilege::OsPrivilege;
use crate::utils::process::SystemProcesses;
use crate::utils::tasks::TokioRunner;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Where the registry keeps its own data and where the client keeps its own.
#[derive(Clone, Debug)]
pub struct RegistryPaths {
    pub app: AppPaths,
    pub riot: RiotPathRules,
    /// Executable written into menu items.
    pub launcher: Utf8PathBuf,
}

impl RegistryPaths {
    /// Paths for the installed tool: data next to the executable, client data
    /// under the user's local application data.
    pub fn discover() -> Result<Self, SError> {
        let local = local_app_data()
            .ok_or_else(|| SError::IOError("Local application data directory not found".into()))?;
        let launcher = MenuExporter::current_launcher()
            .ok_or_else(|| SError::IOError("Could not resolve the running executable".into()))?;

        Ok(Self {
            app: AppPaths::new(&default_base_dir()),
            riot: RiotPathRules::new(&local),
            launcher,
        })
    }
}

/// Wires every component once for the lifetime of the process.
pub struct AppRegistry {
    pub config: SharedConfig,
    pub profiles: Arc<ProfileStore>,
    pub settings: Arc<SettingsSync>,
    pub menu: Arc<MenuExporter>,
    pub switcher: SessionSwitcher,
    archive: Box<dyn ProfileArchive + Send + Sync>,
}

impl AppRegistry {
    pub fn new() -> Result<Self, SError> {
        let runner = TokioRunner::new()?;
        let paths = RegistryPaths::discover()?;
        let env = SwitchEnv {
            linker: Arc::new(JunctionLink),
            processes: Arc::new(SystemProcesses),
            privilege: Arc::new(OsPrivilege),
            runner: Arc::new(runner),
        };
        Ok(Self::with_env(paths, env))
    }

    /// Builds the registry around caller-supplied side effects.
    pub fn with_env(paths: RegistryPaths, env: SwitchEnv) -> Self {
        let config = ConfigStore::shared(&paths.app.config);
        let menu = Arc::new(MenuExporter::new(config.clone(), &paths.launcher));
        let linker: Arc<dyn DirectoryLink> = env.linker.clone();

        let profiles = Arc::new(
            ProfileStore::new(&paths.app.profiles, &paths.riot.client_data, linker)
                .with_observer(menu.clone()),
        );
        let settings = Arc::new(SettingsSync::new(&paths.riot.valorant_config));
        let switcher =
            SessionSwitcher::new(profiles.clone(), settings.clone(), config.clone(), env);

        info!("Profiles at {}", paths.app.profiles);
        Self {
            config,
            profiles,
            settings,
            menu,
            switcher,
            archive: Box::new(ZipProfileArchive),
        }
    }

    /// Stores the client executable after checking it exists.
    pub fn set_client_path(&self, path: &Utf8Path) -> Result<Utf8PathBuf, SError> {
        if !path.is_file() {
            return Err(SError::ClientNotFound(path.to_string()));
        }
        let resolved = ClientLocator::resolve(Some(path), None)
            .ok_or_else(|| SError::ClientNotFound(path.to_string()))?;

        let saved = resolved.clone();
        self.config
            .lock()
            .update(move |c| c.riot_client_exe_path = Some(saved))?;
        info!("Riot client set to {}", resolved);
        Ok(resolved)
    }

    /// Saves the export settings and writes the menu script.
    pub fn export_menu(&self, settings: &MenuExportSettings) -> Result<Utf8PathBuf, SError> {
        self.menu.generate(&self.profiles, settings, true)
    }

    pub fn graphics_settings(&self) -> Result<GraphicsSettings, SError> {
        self.config.lock().graphics_settings(&self.settings)
    }

    /// Persists `settings` then patches the files on disk.
    pub fn apply_graphics_settings(
        &self,
        settings: GraphicsSettings,
        ui_settings: Option<BTreeMap<String, Value>>,
    ) -> Result<Vec<Utf8PathBuf>, SError> {
        self.config
            .lock()
            .save_graphics_settings(settings.clone(), ui_settings)?;
        self.settings.apply(&settings).into_result()
    }

    /// Writes a timestamped archive of every profile into `dir`.
    pub fn backup_profiles(&self, dir: &Utf8Path) -> Result<Utf8PathBuf, SError> {
        let dest = dir.join(format!("{}.zip", backup_file_name(chrono::Local::now())));
        self.profiles.backup(self.archive.as_ref(), &dest)?;
        Ok(dest)
    }

    pub fn restore_profiles(&self, archive: &Utf8Path) -> Result<(), SError> {
        self.profiles.restore(self.archive.as_ref(), archive)
    }
}
