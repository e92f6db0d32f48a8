use thiserror::Error;

/// Errors that can occur while rendering a metadata record
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to serialize record as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to serialize record as TOML: {0}")]
    Toml(#[from] toml::ser::Error),
}
