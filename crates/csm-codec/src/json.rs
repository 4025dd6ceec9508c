use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};
use crate::text::{self, TextEncoding};

/// Decode `bytes` as exactly one JSON document.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], encoding: TextEncoding) -> CodecResult<T> {
    let text = text::decode(bytes, encoding)?;
    serde_json::from_str(&text).map_err(CodecError::Json)
}

/// Serialize `value` compactly and encode the text.
pub fn encode<T: Serialize + ?Sized>(value: &T, encoding: TextEncoding) -> CodecResult<Vec<u8>> {
    let text = serde_json::to_string(value).map_err(CodecError::Serialize)?;
    text::encode(&text, encoding)
}
