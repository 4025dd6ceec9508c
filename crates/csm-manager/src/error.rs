use std::io;
use std::path::PathBuf;

use csm_auth::AuthError;
use csm_codec::CodecError;
use csm_store::StoreError;
use csm_types::{BucketRef, ObjectKey, TypeError};

/// Errors surfaced by the storage facade.
///
/// Nothing is retried or recovered locally; the first failure is returned.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// No viable credential path.
    #[error("configuration error: {0}")]
    Configuration(#[from] AuthError),

    /// Missing or unusable bucket, key or file name.
    #[error("validation error: {0}")]
    Validation(#[from] TypeError),

    /// Malformed text, JSON or NDJSON content.
    #[error("format error: {0}")]
    Format(#[from] CodecError),

    /// The requested object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: BucketRef, key: ObjectKey },

    /// The store was unreachable or rejected the request.
    #[error("transport error: {0}")]
    Transport(StoreError),

    /// A local staging or destination file could not be written, read or
    /// removed.
    #[error("local I/O error on {path}: {source}")]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<StoreError> for ManagerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { bucket, key } => Self::NotFound { bucket, key },
            StoreError::LocalFile { path, source } => Self::LocalIo { path, source },
            other => Self::Transport(other),
        }
    }
}

impl ManagerError {
    pub(crate) fn local_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for facade operations.
pub type ManagerResult<T> = Result<T, ManagerError>;
