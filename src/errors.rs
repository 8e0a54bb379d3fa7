use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Invalid path in {origin} at line {line}: {path:?}, reason: {reason}")]
    InvalidPath {
        origin: String,
        line: usize,
        path: String,
        reason: String,
    },

    #[error("Empty segment in dotted path: {0:?}")]
    EmptySegment(String),

    #[error("Path not found in tree: {0}")]
    PathNotFound(String),

    #[error("Path resolution failed: {path}, reason: {reason}")]
    PathResolution {
        path: PathBuf,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type TreeResult<T> = Result<T, TreeError>;
