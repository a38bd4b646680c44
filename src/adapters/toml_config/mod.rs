// TOML config adapter - Configuration file loading

use crate::domain::errors::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "bgclip.toml";

/// Values read from the `[bgclip]` table; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub videos_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub vaapi_device: Option<PathBuf>,
    pub quality: Option<u8>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    bgclip: FileSettings,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse config file contents
    pub fn parse(toml_content: &str) -> Result<FileSettings, DomainError> {
        let document: ConfigDocument = toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigError(format!("Failed to parse TOML config: {}", e)))?;
        Ok(document.bgclip)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<FileSettings, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Load the explicit config file, or the default one if present
    pub fn discover(
        explicit: Option<&Path>,
    ) -> Result<Option<(PathBuf, FileSettings)>, DomainError> {
        match explicit {
            Some(path) => Ok(Some((path.to_path_buf(), Self::load(path)?))),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    let settings = Self::load(&path)?;
                    Ok(Some((path, settings)))
                } else {
                    Ok(None)
                }
            }
        }
    }
}
