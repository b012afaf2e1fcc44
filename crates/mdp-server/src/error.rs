//! Error types for the HTTP server.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Every port in the configured range is taken.
    #[error("No available ports between {start} and {end} on {host}")]
    NoAvailablePort {
        /// Host the ports were tried on.
        host: String,
        /// First port tried.
        start: u16,
        /// Last port tried.
        end: u16,
    },

    /// The upload directory could not be created.
    #[error("Cannot create upload directory {path}: {source}")]
    UploadDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Multipart body missing or without an `image` file field.
    #[error("Invalid file upload")]
    InvalidUpload,

    /// The stored upload file could not be created.
    #[error("Failed to create file: {0}")]
    CreateFile(#[source] std::io::Error),

    /// The upload data could not be written.
    #[error("Failed to save file: {0}")]
    SaveFile(#[source] std::io::Error),

    /// The watched markdown file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidUpload => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid file upload"}),
            ),
            Self::CreateFile(e) => {
                tracing::error!(error = %e, "Failed to create upload file");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Failed to create file"}),
                )
            }
            Self::SaveFile(e) => {
                tracing::error!(error = %e, "Failed to write upload file");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Failed to save file"}),
                )
            }
            Self::FileNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "File not found", "path": path.display().to_string()}),
            ),
            Self::NoAvailablePort { .. } | Self::UploadDir { .. } | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
