//! Plex library and item models.

use serde::{Deserialize, Serialize};

/// Library section kind as reported by Plex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    Movie,
    Show,
    Artist,
    Photo,
    #[serde(other)]
    Other,
}

impl LibraryKind {
    /// Parse the `type` attribute of a library section.
    pub fn from_plex(kind: &str) -> Self {
        match kind {
            "movie" => LibraryKind::Movie,
            "show" => LibraryKind::Show,
            "artist" => LibraryKind::Artist,
            "photo" => LibraryKind::Photo,
            _ => LibraryKind::Other,
        }
    }

    /// Whether items enumerated from this kind of library carry file paths.
    pub fn has_file_items(&self) -> bool {
        matches!(self, LibraryKind::Movie | LibraryKind::Show)
    }

    /// Plex metadata type number for the leaf items of this library.
    ///
    /// Show libraries list shows by default, which have no media parts, so
    /// their episodes (type 4) are enumerated instead.
    pub fn leaf_item_type(&self) -> Option<u8> {
        match self {
            LibraryKind::Movie => Some(1),
            LibraryKind::Show => Some(4),
            _ => None,
        }
    }
}

impl std::fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibraryKind::Movie => write!(f, "movie"),
            LibraryKind::Show => write!(f, "show"),
            LibraryKind::Artist => write!(f, "artist"),
            LibraryKind::Photo => write!(f, "photo"),
            LibraryKind::Other => write!(f, "other"),
        }
    }
}

/// A library section on a Plex server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Library {
    /// Section key used in URLs.
    pub key: String,
    /// Display name.
    pub title: String,
    /// Section kind.
    pub kind: LibraryKind,
    /// Root folders of the section, in server order.
    pub locations: Vec<String>,
}

/// A media item owned by a Plex server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Plex rating key (item id).
    pub rating_key: String,
    /// Current title.
    pub title: String,
    /// Whether the title field is locked against automatic edits.
    pub title_locked: bool,
    /// Absolute file paths of the item's parts, in enumeration order.
    pub files: Vec<String>,
}

impl MediaItem {
    /// The file that represents this item.
    ///
    /// Multi-part items are represented by their first part, so the mapping
    /// from item to path is not unique when several parts exist.
    pub fn primary_file(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }
}

/// One way of reaching a server advertised by plex.tv.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConnection {
    pub uri: String,
    pub local: bool,
    pub relay: bool,
}

/// A device visible to a Plex account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResource {
    pub name: String,
    /// Comma-separated capabilities, e.g. `server` or `client,player`.
    pub provides: String,
    /// Token for talking to this device.
    pub access_token: Option<String>,
    pub connections: Vec<ServerConnection>,
}

impl ServerResource {
    /// Whether the device is a media server.
    pub fn is_server(&self) -> bool {
        self.provides.split(',').any(|p| p.trim() == "server")
    }

    /// Connections ordered local first, then remote, then relay.
    pub fn ordered_connections(&self) -> Vec<&ServerConnection> {
        let mut connections: Vec<&ServerConnection> = self.connections.iter().collect();
        connections.sort_by_key(|c| (c.relay, !c.local));
        connections
    }
}
