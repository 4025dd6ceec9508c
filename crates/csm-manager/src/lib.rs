//! The cloud storage manager facade.
//!
//! [`CloudStorage`] reads and writes objects as raw files, text, JSON
//! documents or NDJSON record sequences. Each call is a byte transfer
//! through a [`BlobStore`](csm_store::BlobStore) plus one codec step.
//!
//! # Lifecycle
//!
//! ```text
//! ManagerConfig + AmbientEnvironment
//!     → CredentialResolver (once)  → AuthContext
//!     → BackendConfig::open        → Box<dyn BlobStore>
//!     → CloudStorage
//! ```
//!
//! Per call, the key is validated, then the bucket is resolved (call site
//! first, then the configured default), and only then is the store touched.
//! Uploads that go through a local file use a [`StagingArea`]; the staged
//! file is removed on every exit path.

pub mod bucket;
pub mod config;
pub mod error;
pub mod staging;
pub mod storage;

pub use bucket::BucketResolver;
pub use config::ManagerConfig;
pub use error::{ManagerError, ManagerResult};
pub use staging::{StagedResource, StagingArea};
pub use storage::{CloudStorage, Success};
