//! Plex.tv account authentication.
//!
//! The flow is a small state machine:
//!
//! ```text
//! cached token ok ─────────────────────────────────────────┐
//! no/rejected token → AwaitingCredentials ──ok──────────→ Authenticated
//!                         │   ▲ rejected (bounded)           ▲
//!                         │   └──────┘                       │
//!                         └─2FA required→ AwaitingTwoFactor ─┘
//!                                           (bounded)
//! any bound exceeded → Failed
//! ```

use crate::core::credentials::CredentialStore;
use crate::models::credentials::Credentials;
use crate::services::AccountService;
use crate::{Error, Result};

/// Username/password prompts before giving up.
pub const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Verification code prompts before giving up.
pub const MAX_TWO_FACTOR_ATTEMPTS: u32 = 3;

/// Environment fallbacks for the plex.tv login.
pub const USERNAME_ENV: &str = "PLEXAPI_AUTH_MYPLEX_USERNAME";
pub const PASSWORD_ENV: &str = "PLEXAPI_AUTH_MYPLEX_PASSWORD";

/// Source of interactive login input.
pub trait CredentialPrompter {
    fn username(&mut self) -> Result<String>;
    fn password(&mut self, username: &str) -> Result<String>;
    fn two_factor_code(&mut self) -> Result<String>;
}

/// Login values known before prompting, used for the first attempt only.
#[derive(Debug, Clone, Default)]
pub struct LoginHints {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginHints {
    /// Command-line values, falling back to the environment.
    pub fn from_args(username: Option<String>, password: Option<String>) -> Self {
        Self::resolve(
            username,
            password,
            std::env::var(USERNAME_ENV).ok(),
            std::env::var(PASSWORD_ENV).ok(),
        )
    }

    /// Merge command-line values with already-read environment values.
    ///
    /// Empty environment values are treated as unset.
    pub fn resolve(
        username: Option<String>,
        password: Option<String>,
        env_username: Option<String>,
        env_password: Option<String>,
    ) -> Self {
        Self {
            username: username.or(env_username.filter(|v| !v.is_empty())),
            password: password.or(env_password.filter(|v| !v.is_empty())),
        }
    }
}

#[derive(Debug)]
enum AuthState {
    AwaitingCredentials {
        attempt: u32,
    },
    AwaitingTwoFactor {
        username: String,
        password: String,
        attempt: u32,
    },
    Authenticated(String),
    Failed(String),
}

/// Runs the account login against a credential cache.
pub struct Authenticator<'a> {
    account: &'a dyn AccountService,
    store: &'a CredentialStore,
}

impl<'a> Authenticator<'a> {
    pub fn new(account: &'a dyn AccountService, store: &'a CredentialStore) -> Self {
        Self { account, store }
    }

    /// Obtain a plex.tv token, from the cache when possible.
    ///
    /// A freshly issued token is written to the cache; failing to write it is
    /// only a warning.
    pub async fn authenticate(
        &self,
        prompter: &mut dyn CredentialPrompter,
        hints: LoginHints,
    ) -> Result<String> {
        if let Some(token) = self.cached_token().await? {
            return Ok(token);
        }

        let token = self.login(prompter, hints).await?;

        match self.store.save(&Credentials::new(token.clone())) {
            Ok(()) => tracing::info!("Credentials cached for future use."),
            Err(e) => tracing::warn!(
                "Could not save credentials to {}: {}",
                self.store.path().display(),
                e
            ),
        }

        Ok(token)
    }

    async fn cached_token(&self) -> Result<Option<String>> {
        let Some(creds) = self.store.load() else {
            return Ok(None);
        };

        tracing::info!("Using cached credentials...");
        match self.account.verify_token(&creds.token).await {
            Ok(username) => {
                tracing::info!("Signed in to Plex.tv as {}", username);
                Ok(Some(creds.token))
            }
            Err(e) if e.is_rejection() => {
                tracing::warn!("Cached credentials expired, re-authenticating...");
                if let Err(e) = self.store.clear() {
                    tracing::warn!("Could not remove stale credentials: {}", e);
                }
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn login(
        &self,
        prompter: &mut dyn CredentialPrompter,
        mut hints: LoginHints,
    ) -> Result<String> {
        let mut state = AuthState::AwaitingCredentials { attempt: 1 };

        loop {
            state = match state {
                AuthState::AwaitingCredentials { attempt } if attempt > MAX_CREDENTIAL_ATTEMPTS => {
                    AuthState::Failed(format!(
                        "giving up after {} sign-in attempts",
                        MAX_CREDENTIAL_ATTEMPTS
                    ))
                }
                AuthState::AwaitingCredentials { attempt } => {
                    let username = match hints.username.take() {
                        Some(u) => u,
                        None => prompter.username()?,
                    };
                    let username = username.trim().to_string();
                    let password = match hints.password.take() {
                        Some(p) => p,
                        None => prompter.password(&username)?,
                    };

                    if username.is_empty() || password.is_empty() {
                        tracing::warn!("Username and password are both required");
                        AuthState::AwaitingCredentials {
                            attempt: attempt + 1,
                        }
                    } else {
                        tracing::info!("Authenticating with Plex.tv as {}...", username);
                        let result = self.account.sign_in(&username, &password, None).await;
                        match result {
                            Ok(token) => AuthState::Authenticated(token),
                            Err(Error::TwoFactorRequired) => AuthState::AwaitingTwoFactor {
                                username,
                                password,
                                attempt: 1,
                            },
                            Err(Error::Unauthorized(msg)) => {
                                tracing::warn!("Sign-in rejected: {}", msg);
                                AuthState::AwaitingCredentials {
                                    attempt: attempt + 1,
                                }
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
                AuthState::AwaitingTwoFactor { attempt, .. } if attempt > MAX_TWO_FACTOR_ATTEMPTS => {
                    AuthState::Failed(format!(
                        "giving up after {} verification codes",
                        MAX_TWO_FACTOR_ATTEMPTS
                    ))
                }
                AuthState::AwaitingTwoFactor {
                    username,
                    password,
                    attempt,
                } => {
                    let code = prompter.two_factor_code()?;
                    let code = code.trim();
                    let result = self.account.sign_in(&username, &password, Some(code)).await;
                    match result {
                        Ok(token) => AuthState::Authenticated(token),
                        Err(e) if e.is_rejection() => {
                            tracing::warn!("Verification code rejected");
                            AuthState::AwaitingTwoFactor {
                                username,
                                password,
                                attempt: attempt + 1,
                            }
                        }
                        Err(e) => return Err(e),
                    }
                }
                AuthState::Authenticated(token) => return Ok(token),
                AuthState::Failed(reason) => return Err(Error::Auth(reason)),
            };
        }
    }
}
