//! Plex.tv account API client.

use super::plex::http_client;
use super::AccountService;
use crate::models::media::{ServerConnection, ServerResource};
use crate::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;

const PLEX_TV_URL: &str = "https://plex.tv";

/// Plex.tv error code meaning a verification code is needed.
const TWO_FACTOR_REQUIRED_CODE: u32 = 1029;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    #[serde(default)]
    username: String,
    auth_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorList {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    code: Option<u32>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceEntry {
    name: String,
    #[serde(default)]
    provides: String,
    access_token: Option<String>,
    #[serde(default)]
    connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Deserialize)]
struct ConnectionEntry {
    uri: String,
    #[serde(default)]
    local: bool,
    #[serde(default)]
    relay: bool,
}

impl From<ResourceEntry> for ServerResource {
    fn from(entry: ResourceEntry) -> Self {
        ServerResource {
            name: entry.name,
            provides: entry.provides,
            access_token: entry.access_token,
            connections: entry
                .connections
                .into_iter()
                .map(|c| ServerConnection {
                    uri: c.uri,
                    local: c.local,
                    relay: c.relay,
                })
                .collect(),
        }
    }
}

/// Plex.tv account client.
pub struct MyPlexClient {
    base_url: String,
    client: reqwest::Client,
}

impl MyPlexClient {
    /// Create a client for plex.tv.
    pub fn new() -> Result<Self> {
        Self::with_base_url(PLEX_TV_URL)
    }

    /// Create a client against another account service URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client()?,
        })
    }
}

#[async_trait::async_trait]
impl AccountService for MyPlexClient {
    async fn verify_token(&self, token: &str) -> Result<String> {
        let resp = self
            .client
            .get(format!("{}/api/v2/user", self.base_url))
            .header("X-Plex-Token", token)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(Error::Unauthorized("cached token is no longer valid".to_string()));
        }
        if !status.is_success() {
            return Err(Error::Auth(format!("plex.tv returned HTTP {}", status)));
        }

        let user: UserResponse = resp.json().await?;
        Ok(user.username)
    }

    async fn sign_in(&self, username: &str, password: &str, code: Option<&str>) -> Result<String> {
        let mut form = vec![
            ("login", username),
            ("password", password),
            ("rememberMe", "true"),
        ];
        if let Some(code) = code {
            form.push(("verificationCode", code));
        }

        let resp = self
            .client
            .post(format!("{}/api/v2/users/signin", self.base_url))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(sign_in_error(status, &body));
        }

        let user: UserResponse = serde_json::from_str(&body)?;
        user.auth_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Auth("plex.tv response did not contain a token".to_string()))
    }

    async fn resources(&self, token: &str) -> Result<Vec<ServerResource>> {
        let entries: Vec<ResourceEntry> = self
            .client
            .get(format!("{}/api/v2/resources", self.base_url))
            .header("X-Plex-Token", token)
            .query(&[("includeHttps", "1"), ("includeRelay", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(entries.into_iter().map(ServerResource::from).collect())
    }
}

/// Classify a failed sign-in response.
fn sign_in_error(status: StatusCode, body: &str) -> Error {
    let errors = serde_json::from_str::<ErrorList>(body)
        .map(|list| list.errors)
        .unwrap_or_default();

    if errors
        .iter()
        .any(|e| e.code == Some(TWO_FACTOR_REQUIRED_CODE))
    {
        return Error::TwoFactorRequired;
    }

    let message = errors
        .into_iter()
        .map(|e| e.message)
        .find(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
        Error::Unauthorized(message)
    } else {
        Error::Auth(message)
    }
}
