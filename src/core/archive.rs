use crate::models::error::SError;
use camino::Utf8Path;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// Top-level folder inside every backup archive.
const ARCHIVE_ROOT: &str = "profiles";

/// Packs and unpacks the profile tree.
pub trait ProfileArchive {
    fn pack(&self, profiles_root: &Utf8Path, dest: &Utf8Path) -> Result<(), SError>;
    fn unpack(&self, archive: &Utf8Path, profiles_root: &Utf8Path) -> Result<(), SError>;
}

/// Suggested file stem for a new backup, e.g. `GameAccountBackup_1405_19102026`.
pub fn backup_file_name(now: DateTime<Local>) -> String {
    now.format("GameAccountBackup_%H%M_%d%m%Y").to_string()
}

pub struct ZipProfileArchive;

impl ProfileArchive for ZipProfileArchive {
    fn pack(&self, profiles_root: &Utf8Path, dest: &Utf8Path) -> Result<(), SError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = zip::ZipWriter::new(File::create(dest)?);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in WalkDir::new(profiles_root).sort_by_file_name() {
            let entry = entry?;
            let path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                SError::ParseError(format!("Invalid UTF-8 path: {:?}", entry.path()))
            })?;

            let rel = path.strip_prefix(profiles_root)?;
            let name = archive_name(rel);

            if entry.file_type().is_dir() {
                writer.add_directory(format!("{name}/"), options)?;
            } else {
                writer.start_file(name, options)?;
                io::copy(&mut File::open(path)?, &mut writer)?;
            }
        }

        writer.finish()?;
        Ok(())
    }

    fn unpack(&self, archive_path: &Utf8Path, profiles_root: &Utf8Path) -> Result<(), SError> {
        let mut archive = zip::ZipArchive::new(File::open(archive_path)?)?;

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;

            // enclosed_name() rejects entries escaping the destination.
            let Some(safe_path) = file.enclosed_name() else {
                continue;
            };
            let Some(rel) = strip_archive_root(&safe_path) else {
                continue;
            };

            let output_path = profiles_root.as_std_path().join(&rel);

            if file.is_dir() {
                fs::create_dir_all(&output_path)?;
            } else {
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let mut outfile = File::create(&output_path)?;
                io::copy(&mut file, &mut outfile)?;
            }
        }

        Ok(())
    }
}

fn archive_name(rel: &Utf8Path) -> String {
    if rel.as_str().is_empty() {
        ARCHIVE_ROOT.to_string()
    } else {
        format!("{ARCHIVE_ROOT}/{}", rel.as_str().replace('\\', "/"))
    }
}

/// Drops the leading `profiles/` folder. `None` for the root entry itself.
fn strip_archive_root(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    let rel: PathBuf = match components.next()? {
        Component::Normal(first) if first == ARCHIVE_ROOT => components.collect(),
        _ => path.to_path_buf(),
    };
    (!rel.as_os_str().is_empty()).then_some(rel)
}
