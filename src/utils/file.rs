use crate::models::error::SError;
use camino::Utf8Path;
use std::io::Write;
use walkdir::WalkDir;

pub struct FileUtils;

impl FileUtils {
    /// Recursively copies a directory tree from source to destination.
    /// Creates all necessary directories and overwrites existing files.
    /// A source that is itself a link or junction is followed.
    pub fn copy_recursive(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        std::fs::create_dir_all(dst)?;

        for entry in WalkDir::new(src).into_iter() {
            let entry = entry?;
            let src_path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                SError::ParseError(format!("Invalid UTF-8 path: {:?}", entry.path()))
            })?;

            let rel_path = src_path.strip_prefix(src)?;
            let dst_path = dst.join(rel_path);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dst_path)?;
            } else {
                if let Some(parent) = dst_path.parent() {
                    if !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::copy(src_path, &dst_path)?;
            }
        }

        Ok(())
    }

    /// Copies a file or a directory tree to `dst`.
    pub fn copy_item(src: &Utf8Path, dst: &Utf8Path) -> Result<(), SError> {
        if src.is_dir() {
            Self::copy_recursive(src, dst)
        } else {
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(src, dst)?;
            Ok(())
        }
    }

    /// Writes `contents` next to `path` and renames it into place,
    /// so readers never observe a half-written file.
    pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> Result<(), SError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| SError::IOError(format!("Not a file path: {path}")))?;
        let tmp = path.with_file_name(format!(".{file_name}.tmp"));

        let written = std::fs::File::create(&tmp).and_then(|mut f| {
            f.write_all(contents)?;
            f.sync_all()
        });

        if let Err(e) = written.and_then(|_| std::fs::rename(&tmp, path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }

        Ok(())
    }
}
