//! Record errors

use std::path::PathBuf;
use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Debug, Error)]
pub enum RecordError {
    /// A field cannot be rendered in the canonical layout
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Record already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Home directory unavailable; configure an explicit storage directory")]
    HomeDirUnavailable,

    #[error("Record is not valid UTF-8: {}", .0.display())]
    InvalidEncoding(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
