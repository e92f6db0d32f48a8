//! User configuration and virtual-environment helpers for pkgmeta
pub mod config;
pub mod errors;
pub mod venv;

pub use config::Config;
pub use errors::{ConfigError, VenvPathError};
