use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to access config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown config key '{0}' (expected one of: {keys})", keys = crate::config::KEYS.join(", "))]
    UnknownKey(String),

    #[error("uv is not installed. Install it from https://docs.astral.sh/uv/getting-started/installation/ or set uv-path")]
    UvNotFound,

    #[error("Configured uv-path does not exist: {}", .0.display())]
    UvPathMissing(PathBuf),
}

#[derive(Error, Debug, Clone)]
pub enum VenvPathError {
    #[error("Virtual environment not found: {}", .0.display())]
    VenvNotFound(PathBuf),

    #[error("Python executable not found in {}", .0.display())]
    PythonNotFound(PathBuf),
}
