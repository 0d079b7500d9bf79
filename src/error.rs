use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum L10nError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid catalog {}: {message}", .path.display())]
    Catalog { path: PathBuf, message: String },

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("{category}: no entry with key {key:?}")]
    UnknownKey { category: String, key: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl L10nError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        L10nError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        L10nError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, L10nError>;
