use crate::models::error::SError;
use crate::utils::file::FileUtils;
use camino::Utf8Path;

pub struct Json;

impl Json {
    pub fn write<T: serde::Serialize>(path: &Utf8Path, data: &T) -> Result<(), SError> {
        serde_json::to_string_pretty(data)
            .map_err(|e| SError::ParseError(e.to_string()))
            .and_then(|t| FileUtils::write_atomic(path, t.as_bytes()))
    }

    pub fn read<T: serde::de::DeserializeOwned>(path: &Utf8Path) -> Result<T, SError> {
        let s = std::fs::read_to_string(path).map_err(|e| SError::IOError(e.to_string()))?;
        serde_json::from_str::<T>(&s).map_err(|e| SError::ParseError(e.to_string()))
    }
}
