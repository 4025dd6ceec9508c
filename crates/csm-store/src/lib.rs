//! Blob store backends for the cloud storage manager.
//!
//! The storage transport is reduced to the [`BlobStore`] capability: fetch
//! an object's bytes, write an object's bytes, or write from a local file.
//! Everything above this crate (bucket defaults, codecs, staging) is
//! transport-agnostic.
//!
//! # Storage Backends
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- a local directory, one subdirectory per bucket
//! - [`GcsBlobStore`] -- Google Cloud Storage (feature `gcs`, on by default)
//!
//! [`BackendConfig`] selects and opens one of them from configuration.
//!
//! # Design Rules
//!
//! 1. The store never interprets object contents.
//! 2. A missing object is an error ([`StoreError::NotFound`]), never empty bytes.
//! 3. No retries: every failure is returned to the caller as-is.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod config;
pub mod error;
pub mod fs;
#[cfg(feature = "gcs")]
pub mod gcs;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::BackendConfig;
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
#[cfg(feature = "gcs")]
pub use gcs::GcsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
