//! Foundation types for the cloud storage manager (CSM).
//!
//! Every other CSM crate depends on `csm-types`. The types here are small,
//! validated-on-construction values that name *where* data lives and *how* it
//! is shaped, never the data itself.
//!
//! # Key Types
//!
//! - [`BucketRef`] -- Non-empty name of a top-level storage container
//! - [`ObjectKey`] -- Non-empty name of a blob within a bucket
//! - [`PayloadFormat`] -- Text, JSON document or NDJSON sequence

pub mod error;
pub mod format;
pub mod name;

pub use error::TypeError;
pub use format::PayloadFormat;
pub use name::{BucketRef, ObjectKey};
