//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use crate::adapters::toml_config::{FileSettings, TomlConfigAdapter};
use crate::domain::errors::DomainError;
use crate::engine::{EncoderSettings, DEFAULT_QUALITY, DEFAULT_VAAPI_DEVICE};

/// Default output tree root
pub const DEFAULT_VIDEOS_DIR: &str = "videos";

/// Environment variables and the settings they override
pub const ENV_VIDEOS_DIR: &str = "BGCLIP_VIDEOS_DIR";
pub const ENV_DOWNLOAD_DIR: &str = "YT_DOWNLOAD_DIR";
pub const ENV_VAAPI_DEVICE: &str = "BGCLIP_VAAPI_DEVICE";
pub const ENV_QUALITY: &str = "BGCLIP_QUALITY";
pub const ENV_LOG_LEVEL: &str = "BGCLIP_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "BGCLIP_LOG_JSON";

/// Fully resolved runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub videos_dir: PathBuf,
    pub download_dir: Option<PathBuf>,
    pub vaapi_device: PathBuf,
    pub quality: u8,
    pub log_level: Option<String>,
    pub log_json: bool,
    /// Config file the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            videos_dir: PathBuf::from(DEFAULT_VIDEOS_DIR),
            download_dir: None,
            vaapi_device: PathBuf::from(DEFAULT_VAAPI_DEVICE),
            quality: DEFAULT_QUALITY,
            log_level: None,
            log_json: false,
            config_file: None,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub videos_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_json: bool,
}

impl Settings {
    /// Resolve settings following precedence: CLI > Env > File > Defaults.
    ///
    /// Runs before logging is installed, so nothing is logged here; the
    /// caller reports `config_file` once the subscriber is up.
    pub fn resolve(cli: &CliOverrides) -> Result<Self, DomainError> {
        let mut settings = Settings::default();
        if let Some((path, file)) = TomlConfigAdapter::discover(cli.config.as_deref())? {
            settings.apply_file(file);
            settings.config_file = Some(path);
        }
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.apply_cli(cli);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_file(&mut self, file: FileSettings) {
        if let Some(dir) = file.videos_dir {
            self.videos_dir = dir;
        }
        if let Some(dir) = file.download_dir {
            self.download_dir = Some(dir);
        }
        if let Some(device) = file.vaapi_device {
            self.vaapi_device = device;
        }
        if let Some(quality) = file.quality {
            self.quality = quality;
        }
        if let Some(level) = file.log_level {
            self.log_level = Some(level);
        }
        if let Some(json) = file.log_json {
            self.log_json = json;
        }
    }

    /// Apply environment overrides through `lookup`; empty values are ignored
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(ENV_VIDEOS_DIR) {
            self.videos_dir = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_DOWNLOAD_DIR) {
            self.download_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = get(ENV_VAAPI_DEVICE) {
            self.vaapi_device = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_QUALITY) {
            self.quality = value.trim().parse().map_err(|_| {
                DomainError::ConfigError(format!(
                    "{} must be a number, got {:?}",
                    ENV_QUALITY, value
                ))
            })?;
        }
        if let Some(value) = get(ENV_LOG_LEVEL) {
            self.log_level = Some(value);
        }
        if let Some(value) = get(ENV_LOG_JSON) {
            self.log_json = parse_bool(ENV_LOG_JSON, &value)?;
        }
        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(dir) = &cli.videos_dir {
            self.videos_dir = dir.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = Some(dir.clone());
        }
        if let Some(level) = &cli.log_level {
            self.log_level = Some(level.clone());
        }
        if cli.log_json {
            self.log_json = true;
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.quality > 51 {
            return Err(DomainError::ConfigError(format!(
                "quality must be between 0 and 51, got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Download directory, which must already exist
    pub fn require_download_dir(&self) -> Result<&Path, DomainError> {
        match &self.download_dir {
            Some(dir) if dir.is_dir() => Ok(dir.as_path()),
            other => Err(DomainError::ConfigError(format!(
                "Download directory required (--download-dir or {}); got: {}",
                ENV_DOWNLOAD_DIR,
                other
                    .as_ref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_else(|| "None".to_string())
            ))),
        }
    }

    pub fn encoder_settings(&self) -> EncoderSettings {
        EncoderSettings::default()
            .with_vaapi_device(&self.vaapi_device)
            .with_quality(self.quality)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DomainError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DomainError::ConfigError(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.videos_dir, PathBuf::from("videos"));
        assert_eq!(settings.vaapi_device, PathBuf::from("/dev/dri/renderD128"));
        assert_eq!(settings.quality, 18);
        assert!(settings.download_dir.is_none());
        assert!(settings.config_file.is_none());
    }

    #[test]
    fn test_resolve_records_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[bgclip]\nquality = 20\n").unwrap();

        let settings = Settings::resolve(&CliOverrides {
            config: Some(path.clone()),
            ..CliOverrides::default()
        })
        .unwrap();
        assert_eq!(settings.config_file, Some(path));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let mut settings = Settings::default();
        settings.apply_file(FileSettings {
            videos_dir: Some(PathBuf::from("/file/videos")),
            download_dir: Some(PathBuf::from("/file/dl")),
            quality: Some(20),
            ..FileSettings::default()
        });
        settings
            .apply_env(env(&[
                (ENV_VIDEOS_DIR, "/env/videos"),
                (ENV_QUALITY, "24"),
            ]))
            .unwrap();
        settings.apply_cli(&CliOverrides {
            videos_dir: Some(PathBuf::from("/cli/videos")),
            ..CliOverrides::default()
        });

        assert_eq!(settings.videos_dir, PathBuf::from("/cli/videos"));
        assert_eq!(settings.download_dir, Some(PathBuf::from("/file/dl")));
        assert_eq!(settings.quality, 24);
    }

    #[test]
    fn test_env_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(settings.apply_env(env(&[(ENV_QUALITY, "high")])).is_err());
        assert!(settings.apply_env(env(&[(ENV_LOG_JSON, "maybe")])).is_err());
    }

    #[test]
    fn test_env_ignores_empty_values() {
        let mut settings = Settings::default();
        settings.apply_env(env(&[(ENV_DOWNLOAD_DIR, "  ")])).unwrap();
        assert!(settings.download_dir.is_none());
    }

    #[test]
    fn test_validate_quality_range() {
        let settings = Settings {
            quality: 52,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_require_download_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        assert!(settings.require_download_dir().is_err());

        settings.download_dir = Some(dir.path().join("missing"));
        let err = settings.require_download_dir().unwrap_err();
        assert!(err.to_string().contains("missing"));

        settings.download_dir = Some(dir.path().to_path_buf());
        assert_eq!(settings.require_download_dir().unwrap(), dir.path());
    }
}
