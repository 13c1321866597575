//! Error types for loading saved projects.

use thiserror::Error;

use crate::ElementId;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Why a project blob could not be loaded.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The blob is not valid JSON or does not have the expected shape.
    #[error("Malformed project data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The format version has an unknown major number.
    #[error("Unsupported project version: {0}")]
    UnsupportedVersion(String),

    /// Neither `elements` nor `html` is present.
    #[error("Project data has no elements")]
    MissingPayload,

    /// Two elements in the blob share an id.
    #[error("Duplicate element id: {0}")]
    DuplicateId(ElementId),

    /// Reading or writing the blob failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
