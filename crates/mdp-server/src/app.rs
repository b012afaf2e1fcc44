//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::handlers::upload::UPLOADS_ROUTE;
use crate::live_reload;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(static_files::index))
        .route("/guide", get(static_files::guide))
        .route("/static/{*path}", get(static_files::static_asset))
        .route("/convert", post(handlers::convert::convert))
        .route(
            "/upload",
            post(handlers::upload::upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/source", get(handlers::source::get_source))
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&state.upload_dir));

    // WebSocket for live reload
    if state.live_reload_enabled() {
        router = router.route("/ws", get(live_reload::ws_handler));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
