//! The public entry point: bytes in, a decoded [`Value`] or a typed
//! [`DecodeError`] out.

use crate::{
    bits::JContainer,
    container::decode_container,
    error::DecodeError,
    value::Value,
};

fn read_root_header(bytes: &[u8]) -> Result<JContainer, DecodeError> {
    if bytes.len() < 4 {
        return Err(DecodeError::Truncated { offset: 0 });
    }
    Ok(JContainer::decode(u32::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3],
    ])))
}

/// Decodes a buffer holding PostgreSQL's on-disk `jsonb` binary
/// representation (for example, the payload of a `jsonb::bytea` cast)
/// into a [`Value`].
///
/// Rejects buffers shorter than 4 bytes with [`DecodeError::Truncated`].
/// Every other failure mode is one of [`DecodeError`]'s other variants;
/// `decode` never panics, reads out of bounds, or recurses without limit
/// on malformed input.
///
/// # Examples
///
/// ```
/// use pgjsonb::{decode, Value};
///
/// // Top-level header with IS_ARRAY set and count 0: `[]`.
/// let bytes = 0x4000_0000u32.to_le_bytes();
/// assert_eq!(decode(&bytes).unwrap(), Value::Array(Vec::new()));
/// ```
///
/// # Errors
///
/// Returns [`DecodeError`] if `bytes` does not hold a well-formed `jsonb`
/// document.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    let root = read_root_header(bytes)?;

    if root.is_array {
        let value = decode_container(bytes, root, 0)?;
        if root.is_scalar {
            match value {
                Value::Array(mut elems) if elems.len() == 1 => {
                    Ok(elems.pop().expect("length checked above"))
                }
                _ => Err(DecodeError::BadRootHeader { offset: 0 }),
            }
        } else {
            Ok(value)
        }
    } else if root.is_object {
        decode_container(bytes, root, 0)
    } else {
        Err(DecodeError::BadRootHeader { offset: 0 })
    }
}
