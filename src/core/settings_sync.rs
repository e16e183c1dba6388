use crate::core::ini::IniDocument;
use crate::models::error::SError;
use crate::models::graphics::{
    is_default_sentinel, DisplayMode, GraphicsSettings, CLIENT_SETTING_PREFIX, MAX_QUALITY,
    QUALITY_PREFIX,
};
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Directory the settings files must sit in directly.
const PLATFORM_DIR: &str = "Windows";
/// Line after which a missing `FullscreenMode` is inserted.
const FULLSCREEN_ANCHOR: &str = "HDRDisplayOutputNits";
const FULLSCREEN_KEY: &str = "FullscreenMode";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsFile {
    /// Rendering preferences.
    Engine,
    /// Client and audio preferences.
    Platform,
}

impl SettingsFile {
    pub fn file_name(&self) -> &'static str {
        match self {
            SettingsFile::Engine => "GameUserSettings.ini",
            SettingsFile::Platform => "RiotUserSettings.ini",
        }
    }
}

/// Outcome of applying settings to every discovered file.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub patched: Vec<Utf8PathBuf>,
    pub failed: Vec<(Utf8PathBuf, String)>,
}

impl ApplyReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn into_result(self) -> Result<Vec<Utf8PathBuf>, SError> {
        if self.failed.is_empty() {
            return Ok(self.patched);
        }
        Err(SError::SettingsPatch(
            self.failed
                .into_iter()
                .map(|(path, reason)| format!("{path}: {reason}"))
                .collect(),
        ))
    }
}

/// Reads and patches the Valorant settings files under one config root.
pub struct SettingsSync {
    config_root: Utf8PathBuf,
}

impl SettingsSync {
    pub fn new(config_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_root: config_root.into(),
        }
    }

    pub fn config_root(&self) -> &Utf8Path {
        &self.config_root
    }

    /// Every `file` found directly inside a `Windows` directory, in walk order.
    pub fn discover(&self, file: SettingsFile) -> Vec<Utf8PathBuf> {
        if !self.config_root.exists() {
            debug!("Config root does not exist: {}", self.config_root);
            return Vec::new();
        }

        let found: Vec<Utf8PathBuf> = WalkDir::new(&self.config_root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name() == file.file_name())
            .filter(|e| {
                e.path()
                    .parent()
                    .and_then(|p| p.file_name())
                    .is_some_and(|n| n == PLATFORM_DIR)
            })
            .filter_map(|e| Utf8PathBuf::from_path_buf(e.into_path()).ok())
            .collect();

        debug!("Found {} {} file(s)", found.len(), file.file_name());
        found
    }

    /// `sg.*` values from the first engine file.
    pub fn read_quality(&self) -> Result<Option<BTreeMap<String, u8>>, SError> {
        let Some(path) = self.discover(SettingsFile::Engine).into_iter().next() else {
            return Ok(None);
        };

        let doc = IniDocument::parse(&std::fs::read_to_string(&path)?);
        let quality = doc
            .settings()
            .filter(|(k, _)| k.starts_with(QUALITY_PREFIX))
            .filter_map(|(k, v)| v.parse::<u8>().ok().map(|v| (k.to_string(), v.min(MAX_QUALITY))))
            .collect();

        Ok(Some(quality))
    }

    /// `EAres*` values from the first platform file.
    pub fn read_client_settings(&self) -> Result<Option<BTreeMap<String, String>>, SError> {
        let Some(path) = self.discover(SettingsFile::Platform).into_iter().next() else {
            return Ok(None);
        };

        let doc = IniDocument::parse(&std::fs::read_to_string(&path)?);
        let settings = doc
            .settings()
            .filter(|(k, _)| k.starts_with(CLIENT_SETTING_PREFIX))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(Some(settings))
    }

    /// Settings seeded from disk, or built-in defaults where nothing is readable.
    pub fn load_defaults(&self) -> GraphicsSettings {
        let quality = match self.read_quality() {
            Ok(Some(q)) if !q.is_empty() => q,
            Ok(_) => GraphicsSettings::default_quality(),
            Err(e) => {
                warn!("Could not read engine settings: {}", e);
                GraphicsSettings::default_quality()
            }
        };

        let client = match self.read_client_settings() {
            Ok(Some(c)) => c,
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read client settings: {}", e);
                BTreeMap::new()
            }
        };

        GraphicsSettings {
            display_mode: DisplayMode::Default,
            quality,
            ..Default::default()
        }
        .with_client_settings(client)
    }

    /// Patches every discovered file. One file failing does not stop the rest.
    pub fn apply(&self, settings: &GraphicsSettings) -> ApplyReport {
        let mut report = ApplyReport::default();

        let jobs = [
            (SettingsFile::Engine, patch_engine as fn(&mut IniDocument, &GraphicsSettings)),
            (SettingsFile::Platform, patch_platform),
        ];

        for (file, patch) in jobs {
            let paths = self.discover(file);
            if paths.is_empty() {
                info!("No {} files found to update.", file.file_name());
            }

            for path in paths {
                match patch_file(&path, |doc| patch(doc, settings)) {
                    Ok(()) => {
                        info!("Successfully updated: {}", path);
                        report.patched.push(path);
                    }
                    Err(e) => {
                        warn!("Error updating {}: {}", path, e);
                        report.failed.push((path, e.to_string()));
                    }
                }
            }
        }

        report
    }
}

fn patch_file<F>(path: &Utf8Path, patch: F) -> Result<(), SError>
where
    F: FnOnce(&mut IniDocument),
{
    let mut doc = IniDocument::parse(&std::fs::read_to_string(path)?);
    patch(&mut doc);
    FileUtils::write_atomic(path, doc.render().as_bytes())
}

/// Display preset first, then quality keys already present in the file.
pub fn patch_engine(doc: &mut IniDocument, settings: &GraphicsSettings) {
    let mode = settings.display_mode;

    for (key, value) in mode.preset() {
        doc.set_existing(key, value);
    }

    // Any non-default mode owns the key; it is re-added after the anchor or not at all.
    if mode != DisplayMode::Default {
        doc.remove(FULLSCREEN_KEY);
        if let Some(value) = mode.fullscreen_mode() {
            match doc.index_of(FULLSCREEN_ANCHOR) {
                Some(idx) => doc.insert_after(idx, FULLSCREEN_KEY, value),
                None => debug!("No {} anchor; {} left unset", FULLSCREEN_ANCHOR, FULLSCREEN_KEY),
            }
        }
    }

    // Absent quality keys are not appended.
    for (key, value) in &settings.quality {
        if key.starts_with(QUALITY_PREFIX) {
            doc.set_existing(key, &value.min(&MAX_QUALITY).to_string());
        }
    }
}

/// Sentinel values delete the key; others are rewritten or appended.
pub fn patch_platform(doc: &mut IniDocument, settings: &GraphicsSettings) {
    let mut missing = BTreeSet::new();

    for (key, value) in settings.client_settings() {
        if is_default_sentinel(value) {
            doc.remove(key);
        } else if !doc.set_existing(key, value) {
            missing.insert((key, value));
        }
    }

    // BTreeSet keeps the appended block in key order.
    let mut anchor = doc.last_index_with_prefix(CLIENT_SETTING_PREFIX);
    for (key, value) in missing {
        match anchor {
            Some(idx) => {
                doc.insert_after(idx, key, value);
                anchor = Some(idx + 1);
            }
            None => doc.append(key, value),
        }
    }
}
