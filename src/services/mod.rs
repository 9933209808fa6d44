//! Remote service clients and the traits the rest of the crate depends on.

pub mod myplex;
pub mod openai;
pub mod plex;

use crate::models::media::{Library, MediaItem, ServerResource};
use crate::Result;
use openai::ChatRequest;

/// Plex.tv account operations.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Check a cached token, returning the account's username.
    ///
    /// A rejected token yields [`crate::Error::Unauthorized`].
    async fn verify_token(&self, token: &str) -> Result<String>;

    /// Sign in with username and password, returning an auth token.
    ///
    /// Accounts with two-factor enabled yield [`crate::Error::TwoFactorRequired`]
    /// until a verification code is supplied.
    async fn sign_in(&self, username: &str, password: &str, code: Option<&str>) -> Result<String>;

    /// Devices visible to the account.
    async fn resources(&self, token: &str) -> Result<Vec<ServerResource>>;
}

/// Operations on one connected Plex server.
#[async_trait::async_trait]
pub trait LibraryService: Send + Sync {
    /// Human-readable server name.
    fn server_name(&self) -> &str;

    /// Library sections on the server.
    async fn libraries(&self) -> Result<Vec<Library>>;

    /// Leaf items of a library in the server's enumeration order.
    async fn items(&self, library: &Library) -> Result<Vec<MediaItem>>;

    /// Set and lock an item's title.
    async fn update_title(&self, item: &MediaItem, title: &str) -> Result<()>;
}

/// A chat-completion endpoint.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Send one request and return the raw content of the first choice.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
