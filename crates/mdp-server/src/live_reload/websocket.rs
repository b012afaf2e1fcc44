//! WebSocket handler for live reload.
//!
//! Upgrades `/ws` connections and runs a session on each socket.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::session::{Inbound, PushChannel, run_session};
use crate::state::AppState;

/// Handle WebSocket upgrade for live reload.
pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(config) = state.live_reload.clone() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    ws.on_failed_upgrade(|error| {
        tracing::warn!(error = %error, "WebSocket upgrade failed");
    })
    .on_upgrade(move |mut socket| async move {
        let end = run_session(&mut socket, config.watcher.as_ref(), &config.target).await;
        tracing::debug!(reason = ?end, "Live reload session ended");
    })
}

impl PushChannel for WebSocket {
    async fn push_text(&mut self, text: &'static str) -> Result<(), axum::Error> {
        self.send(Message::Text(text.into())).await
    }

    async fn next_inbound(&mut self) -> Option<Result<Inbound, axum::Error>> {
        let message = self.recv().await?;
        Some(message.map(|m| match m {
            Message::Close(_) => Inbound::Close,
            _ => Inbound::Frame,
        }))
    }

    async fn finish(&mut self) {
        // The peer may already be gone
        let _ = self.send(Message::Close(None)).await;
    }
}
