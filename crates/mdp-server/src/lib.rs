//! HTTP server for the mdp markdown previewer.
//!
//! This crate provides an axum server that serves:
//! - The editor page, the markdown guide and their static assets
//! - `POST /convert` for markdown to HTML conversion
//! - `POST /upload` for image uploads, served back under `/uploads`
//! - `GET /api/source` with the watched markdown file
//! - WebSocket `/ws` pushing `reload` whenever the watched file is written
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdp_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         markdown_file: PathBuf::from("notes.md"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config, |url| println!("Listening on {url}")).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (mdp-server)
//!                        │
//!                        ├─► /convert ──► MarkdownConverter (mdp-render)
//!                        │
//!                        ├─► /upload, /uploads ──► upload directory
//!                        │
//!                        ├─► /ws ──► one session per connection
//!                        │             │
//!                        │             └─► FileWatcher subscription (mdp-watch)
//!                        │
//!                        └─► /, /guide, /static ──► mdp-assets
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod net;
mod state;
mod static_files;

use std::path::PathBuf;
use std::sync::Arc;

use mdp_render::MarkdownConverter;
use mdp_watch::FsWatcher;
use state::{AppState, LiveReloadConfig};

pub use error::ServerError;
pub use net::bind_available;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// First port to try.
    pub port: u16,
    /// Last port to try (inclusive).
    pub max_port: u16,
    /// Markdown file to watch and serve.
    pub markdown_file: PathBuf,
    /// Directory for uploaded images.
    pub upload_dir: PathBuf,
    /// Enable live reload.
    pub live_reload_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 8080,
            max_port: 8180,
            markdown_file: PathBuf::from("content.md"),
            upload_dir: PathBuf::from("uploads"),
            live_reload_enabled: true,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// `on_ready` is called with the server URL once the listener is bound.
///
/// # Errors
///
/// Returns an error if the upload directory cannot be created, no port in
/// the range is free, or serving fails.
pub async fn run_server<F>(config: ServerConfig, on_ready: F) -> Result<(), ServerError>
where
    F: FnOnce(&str),
{
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|source| ServerError::UploadDir {
            path: config.upload_dir.clone(),
            source,
        })?;

    if !config.markdown_file.is_file() {
        tracing::warn!(
            file = %config.markdown_file.display(),
            "Markdown file not found, live reload will not work until it exists"
        );
    }

    let live_reload = config.live_reload_enabled.then(|| LiveReloadConfig {
        target: config.markdown_file.clone(),
        watcher: Arc::new(FsWatcher::new()),
    });

    let state = Arc::new(AppState {
        converter: MarkdownConverter::new(),
        markdown_file: config.markdown_file.clone(),
        upload_dir: config.upload_dir.clone(),
        live_reload,
    });

    let app = app::create_router(state);

    let (listener, addr) = bind_available(&config.host, config.port, config.max_port).await?;
    let url = format!("http://{}:{}", config.host, addr.port());
    tracing::info!(
        address = %addr,
        file = %config.markdown_file.display(),
        live_reload = config.live_reload_enabled,
        "Starting server"
    );

    on_ready(&url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdp config.
#[must_use]
pub fn server_config_from_mdp_config(config: &mdp_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        max_port: config.server.max_port,
        markdown_file: config.preview_resolved.file.clone(),
        upload_dir: config.uploads_resolved.dir.clone(),
        live_reload_enabled: config.live_reload.enabled,
    }
}
