//! Editor page and static asset serving.
//!
//! Uses `mdp-assets` for asset retrieval in both embedded and filesystem modes.

use axum::body::Body;
use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Handle GET / (editor page).
pub(crate) async fn index() -> Response {
    serve_asset(mdp_assets::INDEX_PAGE)
}

/// Handle GET /guide (markdown guide).
pub(crate) async fn guide() -> Response {
    serve_asset(mdp_assets::GUIDE_PAGE)
}

/// Handle GET /static/{*path}.
pub(crate) async fn static_asset(Path(path): Path<String>) -> Response {
    serve_asset(&path)
}

fn serve_asset(path: &str) -> Response {
    let Some(content) = mdp_assets::get(path) else {
        tracing::debug!(path, "Asset not found");
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime = mdp_assets::mime_for(path);
    let content_type = if mime.starts_with("text/") {
        format!("{mime}; charset=utf-8")
    } else {
        mime.to_owned()
    };

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        Body::from(content.into_owned()),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_asset_missing() {
        let response = serve_asset("missing.js");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_serve_asset_text_has_charset() {
        let response = serve_asset("styles.css");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/css; charset=utf-8"
        );
    }
}
