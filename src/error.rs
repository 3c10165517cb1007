use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LwyiError {
    #[error("{0}")]
    Usage(String),

    #[error("failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON or unknown schema key. The message carries the
    /// serde_json "at line L column C" pointer.
    #[error("error parsing {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid target model: {0}")]
    ModelValidation(String),

    /// Preprocessing failed for one translation unit.
    #[error("error while processing {path}: {message}")]
    Scan { path: PathBuf, message: String },
}

impl LwyiError {
    pub fn parse(path: impl Into<PathBuf>, source: &serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn scan(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Scan {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LwyiError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
