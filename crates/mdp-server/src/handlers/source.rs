//! Watched document source endpoint.

use std::io::ErrorKind;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/source.
///
/// Returns the current contents of the markdown file so the page can pick
/// up edits made on disk.
pub(crate) async fn get_source(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let content = tokio::fs::read_to_string(&state.markdown_file)
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => ServerError::FileNotFound(state.markdown_file.clone()),
            _ => ServerError::Io(e),
        })?;

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        content,
    ))
}
