use derive_more::Display;

#[derive(Debug, Display)]
pub enum SError {
    #[display("Profile for '{_0}' not found.")]
    ProfileNotFound(String),
    #[display("An account named \"{_0}\" already exists.")]
    NameCollision(String),
    #[display("'{_0}' is not a valid profile name.")]
    InvalidProfileName(String),
    #[display("Icon source not found: {_0}")]
    IconSourceMissing(String),
    #[display("Profile '{_0}' has no icon.")]
    IconMissing(String),
    #[display("No output directory configured for the menu export.")]
    OutputDirMissing,
    #[display("Administrator rights are required to switch accounts.")]
    NotElevated,
    #[display("Riot Client not found at:\n{_0}")]
    ClientNotFound(String),
    #[display("Failed to launch Riot Client at {path}: {reason}")]
    LaunchFailed { path: String, reason: String },
    #[display("Failed to create junction for '{item}': {reason}\nEnsure you are running as Administrator.")]
    JunctionFailed { item: String, reason: String },
    #[display("One or more files failed to update: {}", _0.join("; "))]
    SettingsPatch(Vec<String>),
    #[display("{_0}")]
    IOError(String),
    #[display("{_0}")]
    ParseError(String),
    #[display("Unexpected error")]
    Unexpected,
}

impl std::error::Error for SError {}

impl From<std::io::Error> for SError {
    fn from(e: std::io::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for SError {
    fn from(e: serde_json::Error) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<zip::result::ZipError> for SError {
    fn from(e: zip::result::ZipError) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<walkdir::Error> for SError {
    fn from(e: walkdir::Error) -> Self {
        SError::IOError(e.to_string())
    }
}

impl From<camino::FromPathBufError> for SError {
    fn from(e: camino::FromPathBufError) -> Self {
        SError::ParseError(e.to_string())
    }
}

impl From<std::path::StripPrefixError> for SError {
    fn from(e: std::path::StripPrefixError) -> Self {
        SError::ParseError(e.to_string())
    }
}

#[cfg(feature = "image-codec")]
impl From<image::ImageError> for SError {
    fn from(e: image::ImageError) -> Self {
        SError::IOError(e.to_string())
    }
}
