use crate::config::SharedConfig;
use crate::core::profile_store::{ProfileObserver, ProfileStore};
use crate::models::config::{AppConfig, MenuExportSettings};
use crate::models::error::SError;
use crate::models::paths::MenuPaths;
use crate::models::profile::ProfileChange;
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{debug, error, info, instrument, warn};

/// How the launcher refers to its own icons directory.
const MENU_ICON_PREFIX: &str = r"@app.dir\imports\icons";

/// Renders profiles into the launcher's `.nss` menu script.
pub struct MenuExporter {
    config: SharedConfig,
    launcher: Utf8PathBuf,
}

impl MenuExporter {
    /// `launcher` is the executable each menu item re-invokes with `--switch`.
    pub fn new(config: SharedConfig, launcher: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config,
            launcher: launcher.into(),
        }
    }

    /// The running executable, canonicalized.
    pub fn current_launcher() -> Option<Utf8PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| dunce::canonicalize(p).ok())
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
    }

    /// Writes the menu script. Names absent from `ordered_accounts` are never added;
    /// names without a profile are skipped.
    #[instrument(skip(self, store, settings), fields(output_dir = %settings.output_dir))]
    pub fn generate(
        &self,
        store: &ProfileStore,
        settings: &MenuExportSettings,
        persist: bool,
    ) -> Result<Utf8PathBuf, SError> {
        if settings.output_dir.as_str().is_empty() {
            return Err(SError::OutputDirMissing);
        }

        if persist {
            let saved = settings.clone();
            self.config.lock().update(move |c| {
                c.output_dir = Some(saved.output_dir);
                c.title = saved.title;
                c.menu_icon_path = saved.menu_icon_path;
                c.ordered_accounts = saved.ordered_accounts;
            })?;
        }

        let paths = MenuPaths::new(&settings.output_dir);
        std::fs::create_dir_all(&paths.icons)?;

        let menu_icon = self.copy_menu_icon(&settings.menu_icon_path, &paths.icons);
        let icons: BTreeMap<String, Option<Utf8PathBuf>> = store
            .list()?
            .into_iter()
            .map(|p| (p.name, p.icon))
            .collect();

        let mut script = vec![header_line(&settings.title, menu_icon.as_deref()), "{".to_string()];
        for name in &settings.ordered_accounts {
            let Some(icon) = icons.get(name) else {
                debug!("'{}' has no profile; skipped", name);
                continue;
            };
            script.push(item_line(name, &self.launcher, icon.as_deref()));
        }
        script.push("}".to_string());

        FileUtils::write_atomic(&paths.script, script.join("\n").as_bytes())?;
        info!("Wrote menu script {}", paths.script);
        Ok(paths.script)
    }

    /// Copies the menu icon next to the script and returns the launcher-relative reference.
    fn copy_menu_icon(&self, menu_icon_path: &str, icons_dir: &Utf8Path) -> Option<String> {
        let source = Utf8Path::new(menu_icon_path);
        if menu_icon_path.is_empty() || !source.is_file() {
            return None;
        }

        let file_name = source.file_name()?;
        match std::fs::copy(source, icons_dir.join(file_name)) {
            Ok(_) => Some(format!(r"{MENU_ICON_PREFIX}\{file_name}")),
            Err(e) => {
                warn!("Could not copy menu icon: {}", e);
                None
            }
        }
    }

    /// Applies `change` to the saved ordering and regenerates the script.
    /// Does nothing until an output directory has been configured.
    pub fn refresh(&self, store: &ProfileStore, change: &ProfileChange) -> Result<bool, SError> {
        if self.config.lock().load().output_dir().is_none() {
            return Ok(false);
        }
        info!("Menu auto-update: {:?}", change);

        let restored = match change {
            ProfileChange::Restored => Some(store.names()?),
            _ => None,
        };

        let config = self.config.lock().update(|c| apply_change(c, change, restored))?;
        let Some(output_dir) = config.output_dir().cloned() else {
            return Ok(false);
        };

        let settings = MenuExportSettings {
            output_dir,
            title: config.title,
            ordered_accounts: config.ordered_accounts,
            menu_icon_path: config.menu_icon_path,
        };
        self.generate(store, &settings, false)?;
        Ok(true)
    }
}

impl ProfileObserver for MenuExporter {
    fn on_change(&self, store: &ProfileStore, change: &ProfileChange) {
        if let Err(e) = self.refresh(store, change) {
            error!("Automatic menu update failed: {}", e);
        }
    }
}

fn apply_change(config: &mut AppConfig, change: &ProfileChange, restored: Option<Vec<String>>) {
    let order = &mut config.ordered_accounts;
    match change {
        ProfileChange::Added(name) => {
            if !order.contains(name) {
                order.push(name.clone());
            }
        }
        ProfileChange::Deleted(name) => order.retain(|n| n != name),
        ProfileChange::Renamed { old, new } => {
            if let Some(slot) = order.iter_mut().find(|n| n.as_str() == old.as_str()) {
                *slot = new.clone();
            }
        }
        ProfileChange::Restored => {
            if let Some(mut names) = restored {
                names.sort();
                *order = names;
            }
        }
        ProfileChange::Updated(_) => {}
    }
}

fn header_line(title: &str, icon: Option<&str>) -> String {
    let icon_arg = icon.map(|i| format!(" icon='{i}'")).unwrap_or_default();
    format!("menu(where=sel.count>0 type='namespace|back' mode='multiple' title='{title}'{icon_arg})")
}

fn item_line(name: &str, launcher: &Utf8Path, icon: Option<&Utf8Path>) -> String {
    let icon_arg = icon
        .map(|i| format!(" icon='{}'", i.as_str().replace('/', "\\")))
        .unwrap_or_default();
    format!("    item(title='{name}' cmd='\"{launcher}\"' args='--switch \"{name}\"'{icon_arg})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_keeps_position() {
        let mut config = AppConfig {
            ordered_accounts: vec!["a".into(), "b".into(), "c".into()],
            ..Default::default()
        };
        let change = ProfileChange::Renamed {
            old: "b".into(),
            new: "z".into(),
        };
        apply_change(&mut config, &change, None);
        assert_eq!(config.ordered_accounts, vec!["a", "z", "c"]);
    }

    #[test]
    fn add_is_idempotent_and_delete_removes() {
        let mut config = AppConfig::default();
        apply_change(&mut config, &ProfileChange::Added("a".into()), None);
        apply_change(&mut config, &ProfileChange::Added("a".into()), None);
        assert_eq!(config.ordered_accounts, vec!["a"]);
        apply_change(&mut config, &ProfileChange::Deleted("a".into()), None);
        assert!(config.ordered_accounts.is_empty());
    }

    #[test]
    fn item_line_format() {
        let line = item_line("Main", Utf8Path::new("C:/tools/sk.exe"), None);
        assert_eq!(
            line,
            r#"    item(title='Main' cmd='"C:/tools/sk.exe"' args='--switch "Main"')"#
        );
    }
}
