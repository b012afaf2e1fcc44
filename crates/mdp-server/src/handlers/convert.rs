//! Markdown conversion endpoint.

use std::sync::Arc;

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use serde::Deserialize;

use crate::state::AppState;

/// Form body of POST /convert.
#[derive(Deserialize)]
pub(crate) struct ConvertForm {
    /// Markdown source; missing means empty.
    #[serde(default)]
    markdown: String,
}

/// Handle POST /convert.
pub(crate) async fn convert(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ConvertForm>,
) -> Html<String> {
    Html(state.converter.render_fragment(&form.markdown))
}
