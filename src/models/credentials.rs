//! Cached Plex account credentials.

use serde::{Deserialize, Serialize};

/// Contents of the credential cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Plex.tv authentication token.
    #[serde(alias = "auth_token")]
    pub token: String,
}

impl Credentials {
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self {
            token: token.into(),
        }
    }
}
