use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CodecError, CodecResult};
use crate::text::{self, TextEncoding};

/// Decode an NDJSON payload into its records, in line order.
///
/// Lines may end in `\n` or `\r\n`. Blank (whitespace-only) lines yield no
/// record, so a trailing newline never produces a phantom entry. A malformed
/// line fails the whole decode with its 1-based line number.
pub fn decode<T: DeserializeOwned>(bytes: &[u8], encoding: TextEncoding) -> CodecResult<Vec<T>> {
    let text = text::decode(bytes, encoding)?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| CodecError::NdjsonLine {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

/// Encode records as NDJSON: one compact document per line, each followed by
/// `\n`. Zero records encode to zero bytes.
pub fn encode<I>(records: I, encoding: TextEncoding) -> CodecResult<Vec<u8>>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut out = String::new();
    for (index, record) in records.into_iter().enumerate() {
        let line = serde_json::to_string(&record)
            .map_err(|source| CodecError::SerializeRecord { index, source })?;
        out.push_str(&line);
        out.push('\n');
    }
    text::encode(&out, encoding)
}
