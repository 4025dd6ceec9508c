//! Payload codecs for the cloud storage manager.
//!
//! Three orthogonal conversions between stored bytes and caller values:
//!
//! - [`text`] -- bytes ⇄ `String` under a [`TextEncoding`]
//! - [`json`] -- bytes ⇄ one JSON document (text codec + `serde_json`)
//! - [`ndjson`] -- bytes ⇄ an ordered sequence of JSON documents, one per line
//!
//! Every read or write in the facade is "byte transfer + one codec call", so
//! nothing above this crate parses or serializes payloads itself.
//!
//! # NDJSON wire format
//!
//! One compact JSON value per line, every line terminated by `\n` including
//! the last. Encoding zero values yields zero bytes. Decoding accepts `\r\n`
//! line endings and skips blank lines.

pub mod error;
pub mod json;
pub mod ndjson;
pub mod text;

pub use error::{CodecError, CodecResult};
pub use text::TextEncoding;

#[cfg(test)]
mod strategies;
