use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

const CLIENT_EXE: &str = "RiotClientServices.exe";

/// Finds the Riot client executable.
pub struct ClientLocator;

impl ClientLocator {
    /// Standard install locations, most common first.
    pub fn common_paths() -> Vec<Utf8PathBuf> {
        let mut paths = vec![Utf8PathBuf::from(r"C:\Riot Games\Riot Client").join(CLIENT_EXE)];
        for var in ["PROGRAMFILES", "PROGRAMFILES(X86)"] {
            if let Ok(dir) = std::env::var(var) {
                paths.push(
                    Utf8PathBuf::from(dir)
                        .join("Riot Games")
                        .join("Riot Client")
                        .join(CLIENT_EXE),
                );
            }
        }
        paths
    }

    /// First existing candidate of `explicit`, `configured`, then the common paths.
    pub fn resolve(explicit: Option<&Utf8Path>, configured: Option<&Utf8Path>) -> Option<Utf8PathBuf> {
        explicit
            .into_iter()
            .chain(configured)
            .map(Utf8Path::to_path_buf)
            .chain(Self::common_paths())
            .find(|p| p.is_file())
            .map(|p| dunce::simplified(p.as_std_path()).to_path_buf())
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            .inspect(|p| debug!("Resolved Riot client at {}", p))
    }
}
