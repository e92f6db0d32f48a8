use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use which::which;

/// Overrides the config file location
pub const CONFIG_ENV: &str = "PKGMETA_CONFIG";

/// Build backend whose metadata hook the fallback invokes
pub const DEFAULT_BUILD_BACKEND: &str = "setuptools.build_meta";
/// Packages installed into the disposable build environment
pub const DEFAULT_BUILD_REQUIRES: [&str; 2] = ["setuptools", "wheel"];

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const KEYS: [&str; 4] = ["uv-path", "python-version", "build-backend", "build-requires"];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_path: Option<String>,
    /// Interpreter requested for the build environment; uv's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_requires: Option<Vec<String>>,
}

impl Config {
    /// `$PKGMETA_CONFIG` when set and non-empty, else the per-user default
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let dir = dirs::home_dir()
            .ok_or(ConfigError::NoHomeDir)?
            .join(".config");

        #[cfg(target_os = "windows")]
        let dir = dirs::config_dir().ok_or(ConfigError::NoHomeDir)?;

        Ok(dir.join("pkgmeta").join("pkgmeta.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`; a missing file is the default configuration
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let value = match key {
            "uv-path" => self.uv_path.clone(),
            "python-version" => self.python_version.clone(),
            "build-backend" => self.build_backend.clone(),
            "build-requires" => self.build_requires.as_ref().map(|reqs| reqs.join(", ")),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Set `key`; `build-requires` takes a comma-separated list
    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "uv-path" => self.uv_path = Some(value),
            "python-version" => self.python_version = Some(value),
            "build-backend" => self.build_backend = Some(value),
            "build-requires" => {
                self.build_requires = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|req| !req.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.uv_path.is_none()
            && self.python_version.is_none()
            && self.build_backend.is_none()
            && self.build_requires.is_none()
    }

    /// Explicitly configured values, in key order
    pub fn values(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| match self.get(key) {
                Ok(Some(value)) => Some((*key, value)),
                _ => None,
            })
            .collect()
    }

    pub fn build_backend(&self) -> &str {
        self.build_backend
            .as_deref()
            .unwrap_or(DEFAULT_BUILD_BACKEND)
    }

    pub fn build_requires(&self) -> Vec<String> {
        match &self.build_requires {
            Some(reqs) => reqs.clone(),
            None => DEFAULT_BUILD_REQUIRES.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// The configured `uv-path`, else `uv` found on `PATH`
    pub fn uv_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.uv_path {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
            return Err(ConfigError::UvPathMissing(path));
        }
        which("uv").map_err(|_| ConfigError::UvNotFound)
    }
}
