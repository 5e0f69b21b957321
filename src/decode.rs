//! Turning raw file bytes into text.
//!
//! UTF-8 is tried first, with a leading byte-order mark dropped. Bytes that
//! are not valid UTF-8 are read as Latin-1, which maps every byte to a code
//! point and so always succeeds.

use std::fmt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The encoding a file ended up being read with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("utf-8"),
            Encoding::Latin1 => f.write_str("latin-1"),
        }
    }
}

/// Text produced by one of the decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    pub encoding: Encoding,
}

impl Decoded {
    /// True when the primary (UTF-8) decoder did not accept the bytes.
    pub fn is_fallback(&self) -> bool {
        self.encoding != Encoding::Utf8
    }
}

/// Strict UTF-8, ignoring a single leading byte-order mark.
fn decode_utf8_sig(bytes: &[u8]) -> Option<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// ISO-8859-1, each byte becoming the code point of the same value. Not
/// windows-1252, which remaps 0x80..=0x9F.
fn decode_latin1(bytes: &[u8]) -> String {
    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

/// Decodes `bytes` as UTF-8, falling back to Latin-1.
pub fn decode(bytes: &[u8]) -> Decoded {
    if let Some(text) = decode_utf8_sig(bytes) {
        return Decoded {
            text,
            encoding: Encoding::Utf8,
        };
    }
    log::debug!("utf-8 decoding rejected {} bytes, using latin-1", bytes.len());
    Decoded {
        text: decode_latin1(bytes),
        encoding: Encoding::Latin1,
    }
}
