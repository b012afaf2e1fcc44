//! Serve the preview for one markdown file.

use std::path::PathBuf;

use clap::Args;
use mdp_config::{CliSettings, Config};
use mdp_server::{run_server, server_config_from_mdp_config};

use crate::browser;
use crate::error::CliError;
use crate::output::Output;

/// Server and preview arguments.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdp.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown file to preview and watch (overrides config).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// First port to try (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Last port to try when earlier ones are taken (overrides config).
    #[arg(long)]
    max_port: Option<u16>,

    /// Directory for uploaded images (overrides config).
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Open the browser on startup (default: enabled).
    #[arg(long)]
    open: Option<bool>,

    /// Do not open the browser.
    #[arg(long, conflicts_with = "open")]
    no_open: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    no_live_reload: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;

        output.preview_summary(
            &config.preview_resolved.file,
            &config.uploads_resolved.dir,
            config.live_reload.enabled,
        );

        let open_browser = config.server.open_browser;
        let server_config = server_config_from_mdp_config(&config);
        run_server(server_config, |url| {
            output.listening(url);
            if open_browser && let Err(e) = browser::open(url) {
                tracing::warn!(error = %e, url, "Failed to open browser");
                output.browser_unavailable(url);
            }
        })
        .await?;

        Ok(())
    }

    /// Build config overrides from the parsed flags.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            max_port: self.max_port,
            file: self.file.clone(),
            upload_dir: self.upload_dir.clone(),
            open_browser: self.resolve_open_browser(),
            live_reload_enabled: self.resolve_live_reload_enabled(),
        }
    }

    /// Resolve `open_browser` from --open/--no-open flags.
    fn resolve_open_browser(&self) -> Option<bool> {
        self.no_open.then_some(false).or(self.open)
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}
