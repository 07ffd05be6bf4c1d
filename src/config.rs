use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Mismatched discovery responses tolerated before a list call gives up.
const DEFAULT_RETRY_LIMIT: u32 = 5;

/// Runtime resolver settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Shared retry budget for one whole list operation.
    pub retry_limit: u32,
    /// Passed through to the host discovery service.
    pub secure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            retry_limit: DEFAULT_RETRY_LIMIT,
            secure: false,
        }
    }
}

/// On-disk representation. Every field is optional; missing ones fall back
/// to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub retry_limit: Option<u32>,
    #[serde(default)]
    pub secure: Option<bool>,
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carddav-books")
        .join("config.json")
}

impl FileConfig {
    pub fn load() -> Result<Option<Self>, String> {
        let path = config_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        let cfg: FileConfig =
            serde_json::from_str(&data).map_err(|e| format!("parse config: {e}"))?;
        Ok(Some(cfg))
    }

    pub fn save(&self) -> Result<(), String> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create config dir: {e}"))?;
        }
        let data =
            serde_json::to_string_pretty(self).map_err(|e| format!("serialize config: {e}"))?;
        fs::write(&path, data).map_err(|e| format!("write config: {e}"))
    }
}

impl Config {
    /// Overlay file-config values on top of `self`.
    pub fn with_file_config(self, fc: &FileConfig) -> Self {
        Config {
            retry_limit: fc.retry_limit.unwrap_or(self.retry_limit),
            secure: fc.secure.unwrap_or(self.secure),
        }
    }

    /// Overlay env vars on top of `self`. Unparsable values are ignored.
    pub fn with_env(self) -> Self {
        let retry_limit = std::env::var("CARDDAV_BOOKS_RETRY_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.retry_limit);
        let secure = std::env::var("CARDDAV_BOOKS_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(self.secure);
        Config {
            retry_limit,
            secure,
        }
    }

    /// Resolution order: defaults → config file → env vars.
    pub fn resolve() -> Self {
        let mut config = Config::default();
        match FileConfig::load() {
            Ok(Some(fc)) => {
                log::info!("config loaded from file");
                config = config.with_file_config(&fc);
            }
            Ok(None) => log::debug!("no config file, using defaults"),
            Err(e) => log::warn!("config file error: {e}"),
        }
        config.with_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.retry_limit, 5);
        assert!(!config.secure);
    }

    #[test]
    fn file_config_overlays_present_fields_only() {
        let fc = FileConfig {
            retry_limit: Some(3),
            secure: None,
        };
        let config = Config::default().with_file_config(&fc);
        assert_eq!(config.retry_limit, 3);
        assert!(!config.secure);
    }

    #[test]
    fn empty_file_config_keeps_defaults() {
        let config = Config::default().with_file_config(&FileConfig::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn file_config_parses_partial_json() {
        let fc: FileConfig = serde_json::from_str(r#"{"secure": true}"#).unwrap();
        assert_eq!(fc.retry_limit, None);
        assert_eq!(fc.secure, Some(true));
    }
}
