use std::io;
use std::path::PathBuf;

use csm_types::{BucketRef, ObjectKey};

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: BucketRef, key: ObjectKey },

    /// A local source file handed to `put_file` could not be read.
    #[error("cannot read local file {path}: {source}")]
    LocalFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error from a filesystem-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend cannot represent this key.
    #[error("key {key} rejected by backend: {reason}")]
    InvalidKey { key: ObjectKey, reason: String },

    /// The remote service was unreachable or rejected the request.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configured backend was not compiled into this build.
    #[error("unsupported backend: {0}")]
    Unsupported(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
