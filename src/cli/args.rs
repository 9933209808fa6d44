//! Command line argument definitions.

use crate::models::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Authentication methods (in order of precedence):
  1. Direct: --url/--token
  2. Cached plex.tv token (PLEX_CREDS_FILE, default .creds.json)
  3. plex.tv login: --username/--password, PLEXAPI_AUTH_MYPLEX_* variables,
     or prompted interactively

The AI configuration (endpoint, model, system prompt, temperature) is read
from a YAML config file. OPENAI_API_KEY supplies the API key when the file
has none.";

/// Plex AI Titler - Generate Plex titles from file paths with an LLM
#[derive(Parser, Debug)]
#[command(name = "plex-ai-titler")]
#[command(author, version, about, long_about = None, after_help = AFTER_HELP)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    pub version: (),

    /// Path to YAML config file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Plex server URL (direct connection)
    #[arg(long, requires = "token", conflicts_with_all = ["username", "password"], help_heading = "Direct connection")]
    pub url: Option<String>,

    /// Plex authentication token (direct connection)
    #[arg(long, requires = "url", help_heading = "Direct connection")]
    pub token: Option<String>,

    /// Plex.tv username
    #[arg(short, long, conflicts_with = "token", help_heading = "Plex.tv authentication")]
    pub username: Option<String>,

    /// Plex.tv password (prompted when omitted)
    #[arg(short, long, conflicts_with = "token", help_heading = "Plex.tv authentication")]
    pub password: Option<String>,

    /// Preview titles without asking for the run mode
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Direct connection parameters, when both were given.
    pub fn direct(&self) -> Option<(&str, &str)> {
        match (&self.url, &self.token) {
            (Some(url), Some(token)) => Some((url.as_str(), token.as_str())),
            _ => None,
        }
    }
}
