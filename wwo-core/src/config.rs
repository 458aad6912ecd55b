use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    options::{Format, PackageType, Scheme},
};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WWO_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// package = "premium"
/// scheme = "https"
/// format = "json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub package: PackageType,
    pub scheme: Scheme,
    /// Response format used when a command does not ask for one.
    pub format: Option<Format>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            package: PackageType::Free,
            scheme: Scheme::Https,
            format: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| config_error(path, format!("failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| config_error(path, format!("failed to parse config file: {e}")))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                config_error(path, format!("failed to create config directory: {e}"))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| config_error(path, format!("failed to serialize configuration: {e}")))?;

        fs::write(path, toml)
            .map_err(|e| config_error(path, format!("failed to write config file: {e}")))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "worldweatheronline", "wwo").ok_or_else(|| {
            config_error(
                Path::new(""),
                "could not determine platform config directory".to_string(),
            )
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// API key from `WWO_API_KEY`, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

fn config_error(path: &Path, message: String) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.package, PackageType::Free);
        assert_eq!(cfg.scheme, Scheme::Https);
    }

    #[test]
    fn save_then_load_keeps_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.package = PackageType::Premium;
        cfg.scheme = Scheme::Http;
        cfg.format = Some(Format::Json);
        cfg.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn file_uses_service_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "package = \"premium\"\nformat = \"tab\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.package, PackageType::Premium);
        assert_eq!(cfg.format, Some(Format::Tab));
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "package = \"gold\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
