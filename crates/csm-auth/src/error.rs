use std::io;
use std::path::PathBuf;

/// Errors produced while resolving credentials.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authentication path was viable.
    #[error("could not determine credentials")]
    Unresolved,

    /// The credentials file could not be read.
    #[error("cannot read credentials file {path}: {source}")]
    ReadKeyFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The credentials file is not a JSON object of string values.
    #[error("malformed credentials file {path}: {source}")]
    MalformedKeyFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the auth crate.
pub type AuthResult<T> = Result<T, AuthError>;
