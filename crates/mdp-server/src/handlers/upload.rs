//! Image upload endpoint.
//!
//! Stores the uploaded file under a timestamp name and answers with the
//! markdown snippet that references it.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::ServerError;
use crate::state::AppState;

/// Multipart field holding the image.
const IMAGE_FIELD: &str = "image";

/// URL prefix stored uploads are served under.
pub(crate) const UPLOADS_ROUTE: &str = "/uploads";

/// Response for POST /upload.
#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    /// Image reference to insert into the document.
    markdown: String,
}

/// Handle POST /upload.
pub(crate) async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ServerError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected upload body");
        ServerError::InvalidUpload
    })?;

    let (original_name, data) = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|_| ServerError::InvalidUpload)?
            .ok_or(ServerError::InvalidUpload)?;

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .map(display_name)
            .filter(|name| !name.is_empty())
        else {
            return Err(ServerError::InvalidUpload);
        };
        let data = field
            .bytes()
            .await
            .map_err(|_| ServerError::InvalidUpload)?;
        break (file_name, data);
    };

    let stored_name = stored_file_name(&original_name, SystemTime::now());
    let path = state.upload_dir.join(&stored_name);

    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(ServerError::CreateFile)?;
    file.write_all(&data).await.map_err(ServerError::SaveFile)?;
    file.flush().await.map_err(ServerError::SaveFile)?;

    tracing::info!(file = %path.display(), size = data.len(), "Image uploaded");

    Ok(Json(UploadResponse {
        markdown: format!("![{original_name}]({UPLOADS_ROUTE}/{stored_name})"),
    }))
}

/// Last path component of a client-supplied file name.
fn display_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).to_owned()
}

/// Suffix from the last `.` of `name`, dot included, or empty.
///
/// Dotfiles count as pure extension: `.png` yields `.png`.
fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |dot| &name[dot..])
}

/// Build `<unix nanos><ext>` from the original name's extension.
fn stored_file_name(original: &str, now: SystemTime) -> String {
    let nanos = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();

    format!("{nanos}{}", extension(original))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;

    fn at(nanos: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_nanos(nanos)
    }

    #[test]
    fn test_stored_file_name_keeps_extension() {
        assert_eq!(
            stored_file_name("cat.png", at(1_700_000_000_123_456_789)),
            "1700000000123456789.png"
        );
    }

    #[test]
    fn test_stored_file_name_uses_last_extension() {
        assert_eq!(stored_file_name("photo.final.JPG", at(42)), "42.JPG");
    }

    #[test]
    fn test_stored_file_name_without_extension() {
        assert_eq!(stored_file_name("README", at(7)), "7");
    }

    #[test]
    fn test_stored_file_name_for_dotfile() {
        assert_eq!(stored_file_name(".png", at(42)), "42.png");
    }

    #[test]
    fn test_stored_file_name_keeps_trailing_dot() {
        assert_eq!(stored_file_name("draft.", at(42)), "42.");
    }

    #[test]
    fn test_display_name_strips_directories() {
        assert_eq!(display_name("../../etc/cat.png"), "cat.png");
        assert_eq!(display_name(r"C:\Users\me\cat.png"), "cat.png");
        assert_eq!(display_name("cat.png"), "cat.png");
    }

    #[test]
    fn test_display_name_of_directory_is_empty() {
        assert_eq!(display_name(""), "");
        assert_eq!(display_name("photos/"), "");
    }

    #[test]
    fn test_response_escapes_json() {
        let response = UploadResponse {
            markdown: r#"![a "quoted" name](/uploads/1.png)"#.to_owned(),
        };

        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"markdown":"![a \"quoted\" name](/uploads/1.png)"}"#
        );
    }
}
