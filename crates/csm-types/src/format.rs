use std::fmt;

use serde::{Deserialize, Serialize};

use crate::name::ObjectKey;

/// Shape of an object's payload.
///
/// Not stored alongside the object: the facade method a caller picks decides
/// which format applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Character data, no structure.
    Text,
    /// A single JSON document.
    Json,
    /// Newline-delimited JSON: one document per line.
    Ndjson,
}

impl PayloadFormat {
    /// MIME type conventionally used for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Json => "application/json",
            Self::Ndjson => "application/x-ndjson",
        }
    }

    /// Guess the format from a key's extension.
    pub fn infer(key: &ObjectKey) -> Self {
        let base = key.base_name();
        match base.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
            Some(ext) if ext == "json" => Self::Json,
            Some(ext) if ext == "ndjson" || ext == "jsonl" => Self::Ndjson,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Ndjson => write!(f, "ndjson"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> ObjectKey {
        ObjectKey::new(raw).unwrap()
    }

    #[test]
    fn infer_from_extension() {
        assert_eq!(PayloadFormat::infer(&key("data/items.json")), PayloadFormat::Json);
        assert_eq!(PayloadFormat::infer(&key("rows.NDJSON")), PayloadFormat::Ndjson);
        assert_eq!(PayloadFormat::infer(&key("rows.jsonl")), PayloadFormat::Ndjson);
        assert_eq!(PayloadFormat::infer(&key("notes.txt")), PayloadFormat::Text);
        assert_eq!(PayloadFormat::infer(&key("json/README")), PayloadFormat::Text);
    }

    #[test]
    fn content_types() {
        assert_eq!(PayloadFormat::Ndjson.content_type(), "application/x-ndjson");
        assert_eq!(PayloadFormat::Json.to_string(), "json");
    }
}
