//! Error types for the HTTP server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_site::SiteError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Error from the page or user services.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Request body is not usable JSON.
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Site(SiteError::Validation(_)) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Site(SiteError::Conflict(_)) => StatusCode::FORBIDDEN,
            Self::Site(SiteError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Site(SiteError::MalformedDocument { .. } | SiteError::Io(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Site(e) => e.kind(),
            Self::Body(_) => "validation_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use folio_storage::StorageError;

    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (SiteError::Validation("bad".to_owned()), StatusCode::BAD_REQUEST),
            (SiteError::Conflict("exists".to_owned()), StatusCode::FORBIDDEN),
            (SiteError::NotFound("gone".to_owned()), StatusCode::NOT_FOUND),
            (
                SiteError::MalformedDocument {
                    path: "a.md".to_owned(),
                    message: "broken".to_owned(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SiteError::Io(StorageError::io(std::io::Error::other("disk"), None)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ServerError::from(error).into_response().status(), expected);
        }
    }
}
