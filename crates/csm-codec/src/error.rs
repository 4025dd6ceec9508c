use crate::text::TextEncoding;

/// Errors produced while decoding or encoding payloads.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The label does not name a supported character encoding.
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// The bytes are not valid in the requested encoding.
    #[error("bytes are not valid {encoding}: {reason}")]
    InvalidText {
        encoding: TextEncoding,
        reason: String,
    },

    /// A character has no representation in the target encoding.
    #[error("character {ch:?} at offset {offset} cannot be encoded as {encoding}")]
    Unrepresentable {
        encoding: TextEncoding,
        ch: char,
        offset: usize,
    },

    /// The text is not a single well-formed JSON document.
    #[error("malformed JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// One NDJSON line failed to parse. `line` is 1-based.
    #[error("malformed JSON on line {line}: {source}")]
    NdjsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized.
    #[error("cannot serialize value: {0}")]
    Serialize(#[source] serde_json::Error),

    /// An NDJSON record could not be serialized. `index` is 0-based.
    #[error("cannot serialize record {index}: {source}")]
    SerializeRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the codec crate.
pub type CodecResult<T> = Result<T, CodecError>;
