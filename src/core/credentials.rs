//! Credential cache.
//!
//! Holds the plex.tv token between runs so the operator is only prompted for
//! a password when the cached token is missing or rejected.

use crate::models::credentials::Credentials;
use crate::utils::fs::write_atomic;
use crate::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable overriding the cache location.
pub const CREDS_FILE_ENV: &str = "PLEX_CREDS_FILE";

/// Default cache location, relative to the working directory.
pub const DEFAULT_CREDS_FILE: &str = ".creds.json";

/// File-backed token cache.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store at an explicit path.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at `PLEX_CREDS_FILE`, or `.creds.json` when unset.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(CREDS_FILE_ENV))
    }

    /// Create a store from an already-read `PLEX_CREDS_FILE` value.
    pub fn from_env_value(value: Option<OsString>) -> Self {
        let path = value
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read cached credentials.
    ///
    /// Missing, unreadable or malformed files all mean "nothing cached".
    pub fn load(&self) -> Option<Credentials> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cached credentials at {}", self.path.display());
                return None;
            }
            Err(e) => {
                tracing::warn!("Cannot read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Credentials>(&content) {
            Ok(creds) if !creds.token.trim().is_empty() => Some(creds),
            Ok(_) => {
                tracing::warn!("Ignoring empty token in {}", self.path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Persist credentials, replacing any previous file atomically.
    pub fn save(&self, creds: &Credentials) -> Result<()> {
        let json = serde_json::to_string_pretty(creds)?;
        write_atomic(&self.path, json.as_bytes())?;
        tracing::debug!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    /// Remove the cache file. A missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
