use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Character encodings understood by the text codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    /// 7-bit US-ASCII.
    Ascii,
}

impl TextEncoding {
    /// Canonical label, as accepted by [`FromStr`].
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Utf16Be => "utf-16be",
            Self::Latin1 => "latin-1",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TextEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16le" | "utf-16-le" | "utf16le" => Ok(Self::Utf16Le),
            "utf-16be" | "utf-16-be" | "utf16be" => Ok(Self::Utf16Be),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Ok(Self::Latin1),
            "ascii" | "us-ascii" => Ok(Self::Ascii),
            _ => Err(CodecError::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(encoding: TextEncoding) -> Self {
        encoding.label().to_string()
    }
}

/// Decode `bytes` as text in `encoding`. No transformation beyond charset
/// conversion is applied (a UTF-8 BOM, for instance, is kept).
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> CodecResult<String> {
    let invalid = |reason: String| CodecError::InvalidText { encoding, reason };
    match encoding {
        TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| invalid(e.to_string())),
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            if bytes.len() % 2 != 0 {
                return Err(invalid(format!("odd byte length {}", bytes.len())));
            }
            let units = bytes.chunks_exact(2).map(|pair| {
                let pair = [pair[0], pair[1]];
                if encoding == TextEncoding::Utf16Le {
                    u16::from_le_bytes(pair)
                } else {
                    u16::from_be_bytes(pair)
                }
            });
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|e| invalid(e.to_string()))
        }
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        TextEncoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            Some(offset) => Err(invalid(format!(
                "byte {:#04x} at offset {offset} is outside 7-bit ASCII",
                bytes[offset]
            ))),
            None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        },
    }
}

/// Encode `text` into bytes in `encoding`.
pub fn encode(text: &str, encoding: TextEncoding) -> CodecResult<Vec<u8>> {
    match encoding {
        TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        TextEncoding::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
        TextEncoding::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
        TextEncoding::Latin1 => encode_narrow(text, encoding, 0xFF),
        TextEncoding::Ascii => encode_narrow(text, encoding, 0x7F),
    }
}

/// Single-byte encodings: every code point up to `max` maps to itself.
fn encode_narrow(text: &str, encoding: TextEncoding, max: u32) -> CodecResult<Vec<u8>> {
    text.char_indices()
        .map(|(offset, ch)| {
            u8::try_from(ch as u32)
                .ok()
                .filter(|&b| u32::from(b) <= max)
                .ok_or(CodecError::Unrepresentable {
                    encoding,
                    ch,
                    offset,
                })
        })
        .collect()
}
