use camino::Utf8Path;
use std::fs;
use tracing::{debug, warn};

/// Makes one path resolve transparently to another directory.
pub trait DirectoryLink: Send + Sync {
    /// Creates `link` pointing at `target`. Fails if `link` is occupied.
    fn create(&self, target: &Utf8Path, link: &Utf8Path) -> std::io::Result<()>;

    /// Removes the link itself, never the directory it points at.
    fn remove(&self, link: &Utf8Path) -> std::io::Result<()>;
}

/// Junctions on Windows, symlinks on Unix.
pub struct JunctionLink;

impl DirectoryLink for JunctionLink {
    fn create(&self, target: &Utf8Path, link: &Utf8Path) -> std::io::Result<()> {
        if let Some(parent) = link.parent() {
            fs::create_dir_all(parent)?;
        }

        if link.exists() || link.is_symlink() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("Link location is occupied: {link}"),
            ));
        }

        #[cfg(windows)]
        {
            if target.is_dir() {
                junction::create(target, link)
            } else {
                fs::hard_link(target, link)
            }
        }
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }
    }

    fn remove(&self, link: &Utf8Path) -> std::io::Result<()> {
        if !link.exists() && !link.is_symlink() {
            return Ok(());
        }

        let meta = fs::symlink_metadata(link)?;

        #[cfg(windows)]
        {
            // Junctions report as links, not directories, but are removed like one.
            if meta.is_file() {
                fs::remove_file(link)
            } else {
                fs::remove_dir(link)
            }
        }
        #[cfg(unix)]
        {
            if meta.is_symlink() {
                fs::remove_file(link)
            } else {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Target is not a symlink",
                ))
            }
        }
    }
}

/// Whether `path` is a link or junction rather than a real entry.
pub fn is_link(path: &Utf8Path) -> bool {
    if path.is_symlink() {
        return true;
    }
    #[cfg(windows)]
    {
        if junction::exists(path).unwrap_or(false) {
            return true;
        }
    }
    false
}

/// Reads where a link points, if it is one.
pub fn read_link_target(path: &Utf8Path) -> Option<std::path::PathBuf> {
    #[cfg(windows)]
    {
        if let Ok(target) = junction::get_target(path) {
            return Some(target);
        }
    }
    fs::read_link(path).ok()
}

/// Removes whatever occupies `path`: a link, a real directory or a file.
/// Falls back to a plain `remove_dir` when the primary strategy fails and
/// only logs when both fail.
pub fn clear_path(linker: &dyn DirectoryLink, path: &Utf8Path) -> bool {
    if !path.exists() && !path.is_symlink() {
        return true;
    }

    let primary = if is_link(path) {
        linker.remove(path)
    } else if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match primary {
        Ok(()) => {
            debug!("Cleared {}", path);
            true
        }
        Err(first) => match fs::remove_dir(path) {
            Ok(()) => true,
            Err(_) if !path.exists() && !path.is_symlink() => true,
            Err(second) => {
                warn!("Failed to remove {}: {} / {}", path, first, second);
                false
            }
        },
    }
}
