use thiserror::Error;

/// Validation errors produced when constructing names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("no bucket provided")]
    MissingBucket,

    #[error("no file provided")]
    MissingKey,

    #[error("invalid object key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },
}
