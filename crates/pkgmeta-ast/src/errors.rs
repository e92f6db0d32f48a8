use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A parse failure reported by a [`crate::parser::ScriptParser`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct SyntaxError {
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
    pub message: String,
}

/// Errors that can occur while reading a single descriptor file
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Syntax error in {}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    #[error("Invalid config file {} at line {line}: {message}", path.display())]
    Config {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl ReadError {
    /// Path of the descriptor file that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            ReadError::Io { path, .. }
            | ReadError::Syntax { path, .. }
            | ReadError::Config { path, .. } => path,
        }
    }
}
