//! Plex AI Titler CLI
//!
//! Generates titles for unlocked Plex media items from their file paths using
//! an OpenAI-compatible LLM endpoint.

use clap::Parser;
use plex_ai_titler::cli::{args::Cli, commands::retitle};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    retitle::finish(retitle::retitle(cli).await)?;

    Ok(())
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("plex_ai_titler=debug")
        } else {
            EnvFilter::new("plex_ai_titler=info")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
