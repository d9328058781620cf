//! Service error type.

use folio_storage::{StorageError, StorageErrorKind};

/// Error returned by [`PageService`](crate::PageService) and
/// [`UserService`](crate::UserService).
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Request is missing a field or carries an unusable value.
    #[error("{0}")]
    Validation(String),
    /// Target resource already exists.
    #[error("{0}")]
    Conflict(String),
    /// Target resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Stored file could not be parsed.
    #[error("Malformed document {path}: {message}")]
    MalformedDocument { path: String, message: String },
    /// Backend failure.
    #[error(transparent)]
    Io(StorageError),
}

impl SiteError {
    /// Stable machine-readable error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::MalformedDocument { .. } => "malformed_document",
            Self::Io(_) => "io_failure",
        }
    }

    pub(crate) fn malformed(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<StorageError> for SiteError {
    fn from(err: StorageError) -> Self {
        match err.kind {
            StorageErrorKind::NotFound => Self::NotFound(err.to_string()),
            StorageErrorKind::InvalidPath => Self::Validation(err.to_string()),
            _ => Self::Io(err),
        }
    }
}
