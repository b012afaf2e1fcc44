//! mdp CLI - local markdown preview server.
//!
//! Serves an editor with live preview for one markdown file, reloads the
//! page when the file is written on disk, and opens it in the browser.

mod browser;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::ServeArgs;
use output::Output;

/// mdp - markdown previewer with live reload.
#[derive(Parser)]
#[command(name = "mdp", version, about)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.serve.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(cli.serve.execute()),
        Err(e) => Err(e.into()),
    };

    if let Err(err) = result {
        output.failure(&err);
        std::process::exit(1);
    }
}
