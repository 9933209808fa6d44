//! Retitle command implementation.
//!
//! Loads the AI config, connects to a Plex server, lets the operator pick a
//! library and run mode, then runs the update pipeline.

use crate::cli::args::Cli;
use crate::cli::prompt::TerminalPrompter;
use crate::core::auth::{Authenticator, LoginHints};
use crate::core::credentials::CredentialStore;
use crate::core::generator::TitleGenerator;
use crate::core::pipeline::{RunMode, UpdatePipeline};
use crate::core::session::{self, Chooser};
use crate::models::config::load_config;
use crate::services::myplex::MyPlexClient;
use crate::services::openai::OpenAiClient;
use crate::services::plex::PlexServer;
use crate::services::LibraryService;
use crate::{Error, Result};
use colored::Colorize;

/// Run the whole retitle flow.
pub async fn retitle(cli: Cli) -> Result<()> {
    // Config problems abort before any network call
    let config = load_config(&cli.config)?;
    if config.api_key.is_none() {
        tracing::debug!("No API key configured, sending unauthenticated requests");
    }

    let generator = TitleGenerator::new(Box::new(OpenAiClient::new(&config)), config);
    let mut prompter = TerminalPrompter::new();

    let server = connect(&cli, &mut prompter).await?;
    println!(
        "{} {}",
        "[OK] Connected to:".bold().green(),
        server.server_name()
    );

    let libraries = server.libraries().await?;
    let library = session::select_library(libraries, &mut prompter)?;

    let mode = if cli.dry_run {
        RunMode::DryRun
    } else {
        prompter.choose_run_mode()?
    };

    println!();
    match mode {
        RunMode::DryRun => println!("{}", "[DRY-RUN] Previewing titles:".bold().yellow()),
        RunMode::Apply => println!("{}", "[UPDATE] Updating titles:".bold().cyan()),
    }
    println!("{}", "=".repeat(80));

    let pipeline = UpdatePipeline::new(&server, &generator, mode);
    let report = pipeline.run(&library).await?;

    println!("{}", "=".repeat(80));
    report.print_summary(mode);

    if report.all_failed() {
        return Err(Error::AllItemsFailed(report.failed()));
    }
    Ok(())
}

/// Treat an operator cancel as a clean exit.
pub fn finish(result: Result<()>) -> Result<()> {
    match result {
        Err(Error::Cancelled) => {
            println!("Cancelled.");
            Ok(())
        }
        other => other,
    }
}

/// Connect directly, or through plex.tv when no URL/token was given.
async fn connect(cli: &Cli, prompter: &mut TerminalPrompter) -> Result<PlexServer> {
    if let Some((url, token)) = cli.direct() {
        return session::connect_direct(url, token).await;
    }

    let account = MyPlexClient::new()?;
    let store = CredentialStore::from_env();
    let hints = LoginHints::from_args(cli.username.clone(), cli.password.clone());

    let token = Authenticator::new(&account, &store)
        .authenticate(prompter, hints)
        .await?;

    session::connect_account(&account, &token, prompter).await
}
