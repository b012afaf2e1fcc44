//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use mdp_render::MarkdownConverter;
use mdp_watch::FileWatcher;

/// Live reload settings, fixed for the lifetime of the server.
#[derive(Clone)]
pub(crate) struct LiveReloadConfig {
    /// File every WebSocket session subscribes to.
    pub(crate) target: PathBuf,
    /// Backend used to start one subscription per session.
    pub(crate) watcher: Arc<dyn FileWatcher>,
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Markdown to HTML converter for `/convert`.
    pub(crate) converter: MarkdownConverter,
    /// Markdown file served by `/api/source`.
    pub(crate) markdown_file: PathBuf,
    /// Directory uploaded images are stored in.
    pub(crate) upload_dir: PathBuf,
    /// Live reload settings (if enabled).
    pub(crate) live_reload: Option<LiveReloadConfig>,
}

impl AppState {
    /// Check if live reload is enabled.
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
