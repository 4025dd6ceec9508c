use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Explicitly supplied credentials.
///
/// In TOML configuration this reads as either
/// `credentials = { file_path = "/etc/keys/sa.json" }` or a
/// `[credentials.inline]` table.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Credentials {
    /// Path to a service-account key file (JSON).
    FilePath(PathBuf),
    /// Service-account key fields given directly.
    Inline(BTreeMap<String, String>),
}

impl Credentials {
    /// An empty path or an empty map carries no credentials and is treated
    /// as if nothing had been supplied.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::FilePath(path) => path.as_os_str().is_empty(),
            Self::Inline(map) => map.is_empty(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilePath(path) => f.debug_tuple("FilePath").field(path).finish(),
            Self::Inline(map) => f
                .debug_struct("Inline")
                .field("fields", &map.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// A service-account key: the string fields of a Google key file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceAccountKey(BTreeMap<String, String>);

impl ServiceAccountKey {
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn client_email(&self) -> Option<&str> {
        self.get("client_email")
    }

    pub fn project_id(&self) -> Option<&str> {
        self.get("project_id")
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// Serialize back into key-file JSON, as transports expect it.
    pub fn to_json(&self) -> String {
        // A map of strings always serializes.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email())
            .field("project_id", &self.project_id())
            .finish_non_exhaustive()
    }
}
