use crate::core::archive::ProfileArchive;
use crate::core::linker::{clear_path, read_link_target, DirectoryLink};
use crate::models::error::SError;
use crate::models::paths::{ProfilePaths, LOGIN_DATA_ITEMS};
use crate::models::profile::{Affinity, AffinityFile, ProfileChange, ProfileSummary};
use crate::utils::file::FileUtils;
use crate::utils::json::Json;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Characters Windows refuses in file names.
const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Receives every successful profile mutation.
pub trait ProfileObserver: Send + Sync {
    fn on_change(&self, store: &ProfileStore, change: &ProfileChange);
}

/// Named profiles under one root directory. A directory is a profile.
pub struct ProfileStore {
    root: Utf8PathBuf,
    live_root: Utf8PathBuf,
    linker: Arc<dyn DirectoryLink>,
    observer: Option<Arc<dyn ProfileObserver>>,
}

impl ProfileStore {
    pub fn new(
        root: impl Into<Utf8PathBuf>,
        live_root: impl Into<Utf8PathBuf>,
        linker: Arc<dyn DirectoryLink>,
    ) -> Self {
        Self {
            root: root.into(),
            live_root: live_root.into(),
            linker,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProfileObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn live_root(&self) -> &Utf8Path {
        &self.live_root
    }

    pub fn profile_dir(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.require(name).is_ok()
    }

    /// The name `name` is stored under, which may differ in case.
    pub fn stored_name(&self, name: &str) -> Result<String, SError> {
        self.require(name).map(|(stored, _)| stored)
    }

    fn notify(&self, change: ProfileChange) {
        if let Some(observer) = &self.observer {
            observer.on_change(self, &change);
        }
    }

    /// A temporary directory next to the profile root.
    fn sibling(&self, purpose: &str) -> Utf8PathBuf {
        let name = self.root.file_name().unwrap_or("profiles");
        self.root
            .with_file_name(format!(".{name}.{purpose}-{}", uuid::Uuid::new_v4()))
    }

    /// The stored name matching `name` ignoring case, with its directory.
    fn require(&self, name: &str) -> Result<(String, Utf8PathBuf), SError> {
        validate_name(name)?;
        let stored = self
            .find_folded(name)?
            .ok_or_else(|| SError::ProfileNotFound(name.to_string()))?;
        let dir = self.profile_dir(&stored);
        Ok((stored, dir))
    }

    /// Existing profile whose name matches `name` ignoring case.
    fn find_folded(&self, name: &str) -> Result<Option<String>, SError> {
        let folded = fold(name);
        Ok(self.names()?.into_iter().find(|n| fold(n) == folded))
    }

    /// Profile directory names, sorted.
    pub fn names(&self) -> Result<Vec<String>, SError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = std::fs::read_dir(&self.root)?
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Copies the live login data into the profile, replacing what was there.
    #[instrument(skip(self))]
    pub fn save(&self, name: &str, affinity: Affinity) -> Result<(), SError> {
        validate_name(name)?;
        if let Some(existing) = self.find_folded(name)? {
            if existing != name {
                return Err(SError::NameCollision(existing));
            }
        }

        let dir = self.profile_dir(name);
        std::fs::create_dir_all(&dir)?;

        for item in LOGIN_DATA_ITEMS {
            let source = self.live_root.join(item);
            if !source.exists() {
                debug!("Live item {} absent; skipped", item);
                continue;
            }

            let dest = dir.join(item);
            if links_to(&source, &dest) {
                debug!("Live {} already points at '{}'", item, name);
                continue;
            }
            clear_path(self.linker.as_ref(), &dest);
            FileUtils::copy_item(&source, &dest)?;
        }

        self.write_affinity(&dir, affinity)?;
        info!("Saved profile '{}' ({:?})", name, affinity);
        self.notify(ProfileChange::Added(name.to_string()));
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<ProfileSummary>, SError> {
        self.names()?
            .into_iter()
            .map(|name| {
                let dir = self.profile_dir(&name);
                let icon = ProfilePaths::new(&dir).icon;
                Ok(ProfileSummary {
                    icon: icon.is_file().then_some(icon),
                    affinity: read_affinity(&dir),
                    name,
                })
            })
            .collect()
    }

    pub fn get(&self, name: &str) -> Result<ProfileSummary, SError> {
        let (name, dir) = self.require(name)?;
        let icon = ProfilePaths::new(&dir).icon;
        Ok(ProfileSummary {
            name,
            icon: icon.is_file().then_some(icon),
            affinity: read_affinity(&dir),
        })
    }

    pub fn affinity(&self, name: &str) -> Result<Affinity, SError> {
        self.require(name).map(|(_, dir)| read_affinity(&dir))
    }

    pub fn set_affinity(&self, name: &str, affinity: Affinity) -> Result<(), SError> {
        let (name, dir) = self.require(name)?;
        self.write_affinity(&dir, affinity)?;
        self.notify(ProfileChange::Updated(name));
        Ok(())
    }

    fn write_affinity(&self, dir: &Utf8Path, affinity: Affinity) -> Result<(), SError> {
        Json::write(&ProfilePaths::new(dir).game, &AffinityFile { game: affinity })
    }

    #[instrument(skip(self))]
    pub fn rename(&self, old: &str, new: &str) -> Result<(), SError> {
        validate_name(new)?;
        let (stored, old_dir) = self.require(old)?;
        let old = stored.as_str();

        if old == new {
            return Err(SError::NameCollision(new.to_string()));
        }

        match self.find_folded(new)? {
            Some(existing) if existing != old => return Err(SError::NameCollision(existing)),
            _ => {}
        }

        let new_dir = self.profile_dir(new);
        if fold(old) == fold(new) {
            // Case-only rename; step through a temporary name so it also
            // works where the filesystem ignores case.
            let tmp = self.root.join(format!(".{}.renaming", uuid::Uuid::new_v4()));
            std::fs::rename(&old_dir, &tmp)?;
            std::fs::rename(&tmp, &new_dir)?;
        } else {
            std::fs::rename(&old_dir, &new_dir)?;
        }

        info!("Renamed profile '{}' to '{}'", old, new);
        self.notify(ProfileChange::Renamed {
            old: old.to_string(),
            new: new.to_string(),
        });
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn delete(&self, name: &str) -> Result<(), SError> {
        let (name, dir) = self.require(name)?;
        std::fs::remove_dir_all(&dir)?;
        info!("Deleted profile '{}'", name);
        self.notify(ProfileChange::Deleted(name));
        Ok(())
    }

    pub fn set_icon(&self, name: &str, source: &Utf8Path) -> Result<(), SError> {
        let (name, dir) = self.require(name)?;
        if !source.is_file() {
            return Err(SError::IconSourceMissing(source.to_string()));
        }

        let dest = ProfilePaths::new(&dir).icon;
        store_icon(source, &dest)?;
        self.notify(ProfileChange::Updated(name));
        Ok(())
    }

    pub fn remove_icon(&self, name: &str) -> Result<(), SError> {
        let (name, dir) = self.require(name)?;
        let icon = ProfilePaths::new(&dir).icon;
        if !icon.exists() {
            return Err(SError::IconMissing(name));
        }

        std::fs::remove_file(&icon)?;
        self.notify(ProfileChange::Updated(name));
        Ok(())
    }

    /// Archives the whole profile tree to `dest`.
    pub fn backup(&self, archive: &dyn ProfileArchive, dest: &Utf8Path) -> Result<(), SError> {
        std::fs::create_dir_all(&self.root)?;
        archive.pack(&self.root, dest)?;
        info!("Backed up profiles to {}", dest);
        Ok(())
    }

    /// Replaces the whole profile tree with the archive's contents.
    /// The current tree is only touched once the archive has unpacked cleanly.
    pub fn restore(&self, archive: &dyn ProfileArchive, source: &Utf8Path) -> Result<(), SError> {
        if !source.is_file() {
            return Err(SError::IOError(format!("Backup not found: {source}")));
        }

        let staging = self.sibling("restoring");
        std::fs::create_dir_all(&staging)?;
        if let Err(e) = archive.unpack(source, &staging) {
            discard(&staging);
            return Err(e);
        }

        let previous = self.sibling("previous");
        if self.root.exists() {
            if let Err(e) = std::fs::rename(&self.root, &previous) {
                discard(&staging);
                return Err(e.into());
            }
        }
        if let Err(e) = std::fs::rename(&staging, &self.root) {
            if previous.exists() {
                let _ = std::fs::rename(&previous, &self.root);
            }
            discard(&staging);
            return Err(e.into());
        }
        discard(&previous);

        info!("Restored profiles from {}", source);
        self.notify(ProfileChange::Restored);
        Ok(())
    }
}

fn discard(dir: &Utf8Path) {
    if dir.exists() {
        if let Err(e) = std::fs::remove_dir_all(dir) {
            warn!("Could not remove {}: {}", dir, e);
        }
    }
}

fn read_affinity(dir: &Utf8Path) -> Affinity {
    let path = ProfilePaths::new(dir).game;
    if !path.exists() {
        return Affinity::default();
    }
    Json::read::<AffinityFile>(&path)
        .map(|f| f.game)
        .unwrap_or_else(|e| {
            warn!("Unreadable {}: {}", path, e);
            Affinity::default()
        })
}

/// Whether `link` is a link resolving to `dest`.
fn links_to(link: &Utf8Path, dest: &Utf8Path) -> bool {
    let Some(target) = read_link_target(link) else {
        return false;
    };
    match (dunce::canonicalize(target), dunce::canonicalize(dest)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(feature = "image-codec")]
fn store_icon(source: &Utf8Path, dest: &Utf8Path) -> Result<(), SError> {
    let img = image::open(source)?;
    img.save_with_format(dest, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(not(feature = "image-codec"))]
fn store_icon(source: &Utf8Path, dest: &Utf8Path) -> Result<(), SError> {
    std::fs::copy(source, dest)?;
    Ok(())
}

/// Case folding applied to every name comparison.
fn fold(name: &str) -> String {
    name.to_lowercase()
}

pub fn validate_name(name: &str) -> Result<(), SError> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.ends_with('.')
        || name.chars().any(|c| c.is_control() || INVALID_NAME_CHARS.contains(&c));

    if invalid {
        return Err(SError::InvalidProfileName(name.to_string()));
    }
    Ok(())
}
