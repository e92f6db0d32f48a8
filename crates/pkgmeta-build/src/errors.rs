use pkgmeta_config::{ConfigError, VenvPathError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building metadata through the build backend
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Command failed ({}): {command}{}", status_text(.status.as_ref()), stderr_excerpt(.stderr))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("Build backend produced no *.dist-info directory in {}", .0.display())]
    MissingDistInfo(PathBuf),

    #[error("Invalid METADATA file {}: {message}", path.display())]
    InvalidMetadata { path: PathBuf, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Environment(#[from] VenvPathError),
}

impl BuildError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        BuildError::Io {
            context: context.into(),
            source,
        }
    }
}

fn status_text(status: Option<&i32>) -> String {
    match status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}
