//! UTF-8 string extraction.

use alloc::string::{String, ToString};

use crate::error::DecodeError;

/// Decodes `len` bytes starting at `pos` as a UTF-8 string.
///
/// Zero-length strings are valid and decode to `""`. Fails with
/// [`DecodeError::Truncated`] if `pos + len` exceeds the buffer, or
/// [`DecodeError::InvalidUtf8`] if the slice is not valid UTF-8.
pub(crate) fn decode_string(buf: &[u8], pos: usize, len: usize) -> Result<String, DecodeError> {
    let end = pos
        .checked_add(len)
        .ok_or(DecodeError::Truncated { offset: pos })?;
    let slice = buf
        .get(pos..end)
        .ok_or(DecodeError::Truncated { offset: pos })?;
    core::str::from_utf8(slice)
        .map(str::to_string)
        .map_err(|e| DecodeError::InvalidUtf8 {
            offset: pos,
            detail: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_ascii() {
        let buf = b"hello world";
        assert_eq!(decode_string(buf, 0, 5).unwrap(), "hello");
        assert_eq!(decode_string(buf, 6, 5).unwrap(), "world");
    }

    #[test]
    fn decodes_zero_length() {
        let buf = b"anything";
        assert_eq!(decode_string(buf, 3, 0).unwrap(), "");
    }

    #[test]
    fn decodes_multibyte_and_outside_bmp() {
        let s = "caf\u{e9} \u{1F4A9}";
        let buf = s.as_bytes();
        assert_eq!(decode_string(buf, 0, buf.len()).unwrap(), s);
    }

    #[test]
    fn rejects_truncated_range() {
        let buf = b"abc";
        assert_eq!(
            decode_string(buf, 1, 10),
            Err(DecodeError::Truncated { offset: 1 })
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let buf = [0x61, 0xFF, 0x62];
        match decode_string(&buf, 0, 3) {
            Err(DecodeError::InvalidUtf8 { offset: 0, .. }) => {}
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }
}
