use crate::error::{PressError, Result};
use crate::imaging::{CompressParams, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_MAX_FILE_MB: f64 = 10.0;
const DEFAULT_PAGE_SIZE: usize = 6;

/// A local account the authenticator accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub uid: String,
    pub email: String,
    /// Hex-encoded SHA-256 of the password.
    pub password_sha256: String,
}

/// Configuration for travelpress, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PressConfig {
    /// Cloud name of the hosted image service
    #[serde(default)]
    pub cloud_name: String,

    /// Unsigned upload preset sent with every upload
    #[serde(default)]
    pub upload_preset: String,

    /// Full upload URL, overriding the one derived from `cloud_name`
    #[serde(default)]
    pub upload_endpoint: Option<String>,

    /// Wider images are scaled down to this width (px)
    #[serde(default = "default_max_image_width")]
    pub max_image_width: u32,

    /// JPEG quality, 0..1
    #[serde(default = "default_image_quality")]
    pub image_quality: f32,

    /// Selecting a larger file produces a warning
    #[serde(default = "default_max_file_mb")]
    pub max_file_mb: f64,

    /// Articles per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub accounts: Vec<Account>,
}

fn default_max_image_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_image_quality() -> f32 {
    DEFAULT_QUALITY
}

fn default_max_file_mb() -> f64 {
    DEFAULT_MAX_FILE_MB
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: String::new(),
            upload_endpoint: None,
            max_image_width: DEFAULT_MAX_WIDTH,
            image_quality: DEFAULT_QUALITY,
            max_file_mb: DEFAULT_MAX_FILE_MB,
            page_size: DEFAULT_PAGE_SIZE,
            accounts: Vec::new(),
        }
    }
}

impl PressConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PressError::Io)?;
        let config: PressConfig =
            serde_json::from_str(&content).map_err(PressError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PressError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PressError::Serialization)?;
        fs::write(config_path, content).map_err(PressError::Io)?;
        Ok(())
    }

    pub fn compress_params(&self) -> CompressParams {
        CompressParams {
            max_width: self.max_image_width,
            quality: self.image_quality,
        }
    }

    /// Value of a single setting, by its CLI key.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "cloud-name" => self.cloud_name.clone(),
            "upload-preset" => self.upload_preset.clone(),
            "upload-endpoint" => self.upload_endpoint.clone().unwrap_or_default(),
            "max-image-width" => self.max_image_width.to_string(),
            "image-quality" => self.image_quality.to_string(),
            "max-file-mb" => self.max_file_mb.to_string(),
            "page-size" => self.page_size.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a single setting by its CLI key, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T> {
            value
                .parse()
                .map_err(|_| PressError::validation(key, format!("invalid value '{}'", value)))
        }

        match key {
            "cloud-name" => self.cloud_name = value.to_string(),
            "upload-preset" => self.upload_preset = value.to_string(),
            "upload-endpoint" => {
                self.upload_endpoint = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "max-image-width" => {
                let width: u32 = parse("max-image-width", value)?;
                if width == 0 {
                    return Err(PressError::validation("max-image-width", "must be positive"));
                }
                self.max_image_width = width;
            }
            "image-quality" => {
                let quality: f32 = parse("image-quality", value)?;
                if !(quality > 0.0 && quality <= 1.0) {
                    return Err(PressError::validation("image-quality", "must be in (0, 1]"));
                }
                self.image_quality = quality;
            }
            "max-file-mb" => self.max_file_mb = parse("max-file-mb", value)?,
            "page-size" => {
                let size: usize = parse("page-size", value)?;
                if size == 0 {
                    return Err(PressError::validation("page-size", "must be at least 1"));
                }
                self.page_size = size;
            }
            other => return Err(PressError::Api(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    pub const KEYS: &'static [&'static str] = &[
        "cloud-name",
        "upload-preset",
        "upload-endpoint",
        "max-image-width",
        "image-quality",
        "max-file-mb",
        "page-size",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PressConfig::default();
        assert_eq!(config.max_image_width, 2000);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.compress_params().jpeg_quality(), 78);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = PressConfig::load(dir.path().join("nothing-here")).unwrap();
        assert_eq!(config, PressConfig::default());
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"cloud_name":"demo"}"#).unwrap();
        let config = PressConfig::load(dir.path()).unwrap();
        assert_eq!(config.cloud_name, "demo");
        assert_eq!(config.max_file_mb, 10.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PressConfig::default();
        config.set("upload-preset", "travel_preset").unwrap();
        config.set("page-size", "9").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = PressConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.upload_preset, "travel_preset");
        assert_eq!(loaded.page_size, 9);
    }

    #[test]
    fn test_set_validates() {
        let mut config = PressConfig::default();
        assert!(config.set("image-quality", "1.5").is_err());
        assert!(config.set("page-size", "zero").is_err());
        assert!(config.set("colour", "blue").is_err());
        config.set("image-quality", "0.5").unwrap();
        assert_eq!(config.get("image-quality").as_deref(), Some("0.5"));
    }

    #[test]
    fn every_key_is_readable() {
        let config = PressConfig::default();
        for key in PressConfig::KEYS {
            assert!(config.get(key).is_some(), "{}", key);
        }
    }
}
