//! Text decoding for delimited uploads

use encoding_rs::UTF_8;
use std::borrow::Cow;

/// Decodes raw upload bytes as text.
///
/// UTF-8 is assumed; a byte order mark switches to the encoding it names
/// (UTF-8 or UTF-16) and is dropped. Malformed sequences become U+FFFD
/// instead of failing, matching how a browser reads a text file.
pub(crate) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (text, encoding, had_errors) = UTF_8.decode(bytes);
    if had_errors || encoding != UTF_8 {
        tracing::debug!(encoding = encoding.name(), had_errors, "decoded delimited text");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8() {
        assert_eq!(decode_text("Ñame,email".as_bytes()), "Ñame,email");
    }

    #[test]
    fn strips_utf8_bom() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFemail"), "email");
    }

    #[test]
    fn follows_utf16_bom() {
        let bytes = [0xFF, 0xFE, b'a', 0x00, b',', 0x00, b'b', 0x00];
        assert_eq!(decode_text(&bytes), "a,b");
    }

    #[test]
    fn replaces_malformed_sequences() {
        assert_eq!(decode_text(b"a\xFFb"), "a\u{FFFD}b");
    }
}
