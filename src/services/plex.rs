//! Plex Media Server client.

use super::LibraryService;
use crate::models::media::{Library, LibraryKind, MediaItem, ServerResource};
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const PRODUCT: &str = "Plex AI Titler";
const TOKEN_HEADER: &str = "X-Plex-Token";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Stable client identifier for this machine.
///
/// Plex lists every identifier as a separate device, so it is derived from the
/// device name rather than generated per run.
pub fn client_identifier() -> String {
    let seed = format!("{}:{}", PRODUCT, whoami::devicename());
    uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, seed.as_bytes()).to_string()
}

/// Headers Plex expects on every request.
pub fn plex_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert("X-Plex-Product", HeaderValue::from_static(PRODUCT));
    headers.insert(
        "X-Plex-Version",
        HeaderValue::from_static(env!("CARGO_PKG_VERSION")),
    );

    let dynamic = [
        ("X-Plex-Client-Identifier", client_identifier()),
        ("X-Plex-Device-Name", whoami::devicename()),
        ("X-Plex-Platform", std::env::consts::OS.to_string()),
    ];
    for (name, value) in dynamic {
        match HeaderValue::from_str(&value) {
            Ok(v) => {
                headers.insert(name, v);
            }
            Err(_) => tracing::debug!("Skipping header {} with invalid value", name),
        }
    }

    headers
}

/// HTTP client preconfigured with Plex headers.
pub fn http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .default_headers(plex_headers())
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// `MediaContainer` envelope used by every server response.
#[derive(Debug, Deserialize)]
struct Container<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerInfo {
    friendly_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SectionList {
    #[serde(rename = "Directory", default)]
    directories: Vec<SectionEntry>,
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    key: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "Location", default)]
    locations: Vec<LocationEntry>,
}

#[derive(Debug, Deserialize)]
struct LocationEntry {
    path: String,
}

#[derive(Debug, Deserialize)]
struct MetadataList {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataEntry {
    rating_key: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "Field", default)]
    fields: Vec<FieldEntry>,
    #[serde(rename = "Media", default)]
    media: Vec<MediaEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    #[serde(default)]
    locked: bool,
}

#[derive(Debug, Deserialize)]
struct MediaEntry {
    #[serde(rename = "Part", default)]
    parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
struct PartEntry {
    file: Option<String>,
}

impl From<SectionEntry> for Library {
    fn from(entry: SectionEntry) -> Self {
        Library {
            key: entry.key,
            title: entry.title,
            kind: LibraryKind::from_plex(&entry.kind),
            locations: entry.locations.into_iter().map(|l| l.path).collect(),
        }
    }
}

impl From<MetadataEntry> for MediaItem {
    fn from(entry: MetadataEntry) -> Self {
        let title_locked = entry
            .fields
            .iter()
            .any(|f| f.name == "title" && f.locked);
        let files = entry
            .media
            .into_iter()
            .flat_map(|m| m.parts)
            .filter_map(|p| p.file)
            .filter(|f| !f.is_empty())
            .collect();

        MediaItem {
            rating_key: entry.rating_key,
            title: entry.title,
            title_locked,
            files,
        }
    }
}

/// A connected Plex Media Server.
pub struct PlexServer {
    base_url: String,
    token: String,
    friendly_name: String,
    client: reqwest::Client,
}

impl PlexServer {
    /// Connect directly to a server by URL and token.
    pub async fn connect(url: &str, token: &str) -> Result<Self> {
        let client = http_client()?;
        Self::connect_with(client, url, token).await
    }

    /// Connect to an account resource, trying its connections in preference order.
    pub async fn connect_resource(resource: &ServerResource, account_token: &str) -> Result<Self> {
        let token = resource.access_token.as_deref().unwrap_or(account_token);
        let client = http_client()?;

        for connection in resource.ordered_connections() {
            tracing::debug!("Trying {} via {}", resource.name, connection.uri);
            match Self::connect_with(client.clone(), &connection.uri, token).await {
                Ok(server) => return Ok(server),
                Err(e) => tracing::debug!("Connection {} failed: {}", connection.uri, e),
            }
        }

        Err(Error::Connection(format!(
            "no reachable connection for server '{}'",
            resource.name
        )))
    }

    async fn connect_with(client: reqwest::Client, url: &str, token: &str) -> Result<Self> {
        let base_url = url.trim_end_matches('/').to_string();

        let resp = client
            .get(format!("{}/", base_url))
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| Error::Connection(format!("{}: {}", base_url, e)))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Connection(format!("{}: token rejected", base_url)));
        }
        if !status.is_success() {
            return Err(Error::Connection(format!("{}: HTTP {}", base_url, status)));
        }

        let info: Container<ServerInfo> = resp
            .json()
            .await
            .map_err(|e| Error::Connection(format!("{}: unexpected response: {}", base_url, e)))?;

        let friendly_name = info
            .media_container
            .friendly_name
            .unwrap_or_else(|| base_url.clone());

        Ok(Self {
            base_url,
            token: token.to_string(),
            friendly_name,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

#[async_trait::async_trait]
impl LibraryService for PlexServer {
    fn server_name(&self) -> &str {
        &self.friendly_name
    }

    async fn libraries(&self) -> Result<Vec<Library>> {
        let sections: Container<SectionList> = self.get_json("/library/sections", &[]).await?;
        Ok(sections
            .media_container
            .directories
            .into_iter()
            .map(Library::from)
            .collect())
    }

    async fn items(&self, library: &Library) -> Result<Vec<MediaItem>> {
        let mut query = Vec::new();
        if let Some(item_type) = library.kind.leaf_item_type() {
            query.push(("type", item_type.to_string()));
        }

        let path = format!("/library/sections/{}/all", library.key);
        let list: Container<MetadataList> = self.get_json(&path, &query).await?;
        Ok(list
            .media_container
            .metadata
            .into_iter()
            .map(MediaItem::from)
            .collect())
    }

    async fn update_title(&self, item: &MediaItem, title: &str) -> Result<()> {
        let url = format!("{}/library/metadata/{}", self.base_url, item.rating_key);
        let resp = self
            .client
            .put(url)
            .header(TOKEN_HEADER, &self.token)
            .query(&[("title.value", title), ("title.locked", "1")])
            .send()
            .await
            .map_err(|e| Error::Update(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Update(format!("HTTP {}", status)));
        }
        Ok(())
    }
}
