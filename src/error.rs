//! Error types for the titler.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the titler.
#[derive(Error, Debug)]
pub enum Error {
    // Startup errors
    #[error("Config error: {0}")]
    Config(String),

    // Plex account errors
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Plex.tv rejected the credentials: {0}")]
    Unauthorized(String),

    #[error("Two-factor verification code required")]
    TwoFactorRequired,

    // Plex server errors
    #[error("Could not connect to Plex server: {0}")]
    Connection(String),

    // Per-item errors
    #[error("Title generation failed: {0}")]
    Generation(String),

    #[error("Title update failed: {0}")]
    Update(String),

    // Batch outcome
    #[error("All {0} attempted items failed")]
    AllItemsFailed(usize),

    #[error("Cancelled by user")]
    Cancelled,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // YAML errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // Terminal prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error means the account service refused a login or token.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Unauthorized(_) | Error::TwoFactorRequired)
    }
}
