//! Recursive (explicit-stack) traversal of `jsonb` arrays and objects.
//!
//! The on-disk container is a 4-byte `JContainer` header followed by one
//! `JEntry` per array element (or two per object entry: all keys, then all
//! values), followed by the values area those entries describe. Every
//! `JEntry` carries either a length or (sparsely, via `HAS_OFF`) an
//! offset-of-end relative to the values area; the decoder reconstructs a
//! running offset (`voff`) sequentially and only consults `HAS_OFF` to turn
//! an offset back into a length.
//!
//! Recursion into nested containers is modeled as an explicit work stack
//! rather than native call recursion, so a maliciously deep `jsonb` buffer
//! fails with [`DecodeError::TooDeep`] instead of exhausting the call stack
//! (see the module's `MAX_DEPTH`).

use alloc::{string::String, vec::Vec};

use crate::{
    align::align_up4,
    bits::{JContainer, JEntry, JEntryType},
    error::DecodeError,
    numeric::decode_numeric,
    strings::decode_string,
    value::{Map, Value},
};

/// Cap on container nesting depth: bounds memory use on
/// adversarial input and keeps the explicit stack itself from growing
/// without limit.
pub(crate) const MAX_DEPTH: usize = 1000;

/// One container awaiting completion on the explicit work stack.
///
/// Mirrors the on-disk array/object traversal: `n` is the `JContainer`'s
/// element count, while `entry_count` is `n` for an array and `2 * n` for
/// an object (keys then values). `items` accumulates decoded children in
/// `JEntry` order; for an object it is split into keys and values once
/// `index` reaches `entry_count`.
struct Frame {
    is_object: bool,
    n: usize,
    entries_start: usize,
    values_start: usize,
    entry_count: usize,
    index: usize,
    voff: u32,
    items: Vec<Value>,
}

fn read_u32_le(buf: &[u8], pos: usize) -> Result<u32, DecodeError> {
    let end = pos
        .checked_add(4)
        .ok_or(DecodeError::Truncated { offset: pos })?;
    let slice = buf
        .get(pos..end)
        .ok_or(DecodeError::Truncated { offset: pos })?;
    Ok(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

/// Builds the frame for a container whose header `jc` was read at `pos`
/// (`pos` itself points at the header word, already 4-byte aligned).
fn new_frame(buf: &[u8], jc: JContainer, pos: usize) -> Result<Frame, DecodeError> {
    if !jc.is_array && !jc.is_object {
        return Err(DecodeError::BadHeader { offset: pos });
    }

    let n = jc.count as usize;
    let entry_count = if jc.is_object {
        n.checked_mul(2).ok_or(DecodeError::Truncated { offset: pos })?
    } else {
        n
    };

    let entries_start = pos.checked_add(4).ok_or(DecodeError::Truncated { offset: pos })?;
    let entries_bytes = entry_count
        .checked_mul(4)
        .ok_or(DecodeError::Truncated { offset: pos })?;
    let values_start = entries_start
        .checked_add(entries_bytes)
        .ok_or(DecodeError::Truncated { offset: pos })?;

    // A zero-length container still needs entries_start/values_start to be
    // well-defined, but no JEntry word is ever read for it (the bounds
    // check below only applies when entry_count > 0).
    if entry_count > 0 {
        let last_entry_end = entries_start + entries_bytes;
        if last_entry_end > buf.len() {
            return Err(DecodeError::Truncated { offset: entries_start });
        }
    }

    Ok(Frame {
        is_object: jc.is_object,
        n,
        entries_start,
        values_start,
        entry_count,
        index: 0,
        voff: 0,
        items: Vec::with_capacity(entry_count),
    })
}

fn finish_frame(frame: Frame) -> Result<Value, DecodeError> {
    if frame.is_object {
        let mut map = Map::new();
        let (keys, values) = frame.items.split_at(frame.n);
        for (k, v) in keys.iter().zip(values.iter()) {
            let key = match k {
                Value::String(s) => s.clone(),
                _ => unreachable!("key entries are validated to be strings before this point"),
            };
            map.insert(key, v.clone());
        }
        Ok(Value::Object(map))
    } else {
        Ok(Value::Array(frame.items))
    }
}

/// Decodes the container whose header word is `jc`, located at `pos`.
/// `pos` must already be 4-byte aligned; callers are responsible for
/// realigning before recursing into a nested container.
pub(crate) fn decode_container(buf: &[u8], jc: JContainer, pos: usize) -> Result<Value, DecodeError> {
    if !jc.is_array && !jc.is_object {
        return Err(DecodeError::BadHeader { offset: pos });
    }

    let mut stack: Vec<Frame> = Vec::new();
    stack.push(new_frame(buf, jc, pos)?);

    loop {
        let frame_done = {
            let frame = stack.last().expect("stack is never empty inside the loop");
            frame.index == frame.entry_count
        };

        if frame_done {
            let frame = stack.pop().expect("checked above");
            let value = finish_frame(frame)?;
            match stack.last_mut() {
                None => return Ok(value),
                Some(parent) => parent.items.push(value),
            }
            continue;
        }

        // Processing the next JEntry of the frame on top of the stack
        // requires mutable access to it, but recursing into a nested
        // container requires pushing a new frame -- so we compute
        // everything we need up front and only push once we're done
        // borrowing `frame`.
        let (je, child_pos, advance_to, is_key_slot) = {
            let frame = stack.last_mut().expect("checked above");
            let i = frame.index;
            let je_word = read_u32_le(buf, frame.entries_start + 4 * i)?;
            let je = JEntry::decode(je_word);

            let len = if je.has_off {
                je.offlen
                    .checked_sub(frame.voff)
                    .ok_or(DecodeError::BadEntry {
                        offset: frame.entries_start + 4 * i,
                    })?
            } else {
                je.offlen
            };

            let child_pos = frame
                .values_start
                .checked_add(frame.voff as usize)
                .ok_or(DecodeError::Truncated {
                    offset: frame.values_start,
                })?;
            let new_voff = frame.voff.checked_add(len).ok_or(DecodeError::Truncated {
                offset: child_pos,
            })?;

            let is_key_slot = frame.is_object && i < frame.n;

            frame.voff = new_voff;
            frame.index += 1;

            (je, child_pos, len, is_key_slot)
        };

        if is_key_slot && je.kind != JEntryType::String {
            return Err(DecodeError::MalformedObject { offset: child_pos });
        }

        match je.kind {
            JEntryType::Null => {
                if advance_to != 0 {
                    return Err(DecodeError::BadEntry { offset: child_pos });
                }
                stack
                    .last_mut()
                    .expect("checked above")
                    .items
                    .push(Value::Null);
            }
            JEntryType::BoolTrue => {
                if advance_to != 0 {
                    return Err(DecodeError::BadEntry { offset: child_pos });
                }
                stack
                    .last_mut()
                    .expect("checked above")
                    .items
                    .push(Value::Bool(true));
            }
            JEntryType::BoolFalse => {
                if advance_to != 0 {
                    return Err(DecodeError::BadEntry { offset: child_pos });
                }
                stack
                    .last_mut()
                    .expect("checked above")
                    .items
                    .push(Value::Bool(false));
            }
            JEntryType::String => {
                let s: String = decode_string(buf, child_pos, advance_to as usize)?;
                stack
                    .last_mut()
                    .expect("checked above")
                    .items
                    .push(Value::String(s));
            }
            JEntryType::Numeric => {
                let n = decode_numeric(buf, child_pos, advance_to as usize)?;
                stack
                    .last_mut()
                    .expect("checked above")
                    .items
                    .push(Value::Number(n));
            }
            JEntryType::Container => {
                let padded = align_up4(child_pos);
                let child_jc_word = read_u32_le(buf, padded)?;
                let child_jc = JContainer::decode(child_jc_word);
                if stack.len() + 1 > MAX_DEPTH {
                    return Err(DecodeError::TooDeep {
                        offset: padded,
                        limit: MAX_DEPTH,
                    });
                }
                let child_frame = new_frame(buf, child_jc, padded)?;
                stack.push(child_frame);
            }
            JEntryType::Unknown(_) => {
                return Err(DecodeError::BadEntry { offset: child_pos });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_at(buf: &[u8], pos: usize) -> Result<Value, DecodeError> {
        let jc = JContainer::decode(read_u32_le(buf, pos).unwrap());
        decode_container(buf, jc, pos)
    }

    #[test]
    fn empty_array() {
        let buf = 0x4000_0000u32.to_le_bytes();
        assert_eq!(decode_at(&buf, 0).unwrap(), Value::Array(Vec::new()));
    }

    #[test]
    fn empty_object() {
        let buf = 0x2000_0000u32.to_le_bytes();
        assert_eq!(decode_at(&buf, 0).unwrap(), Value::Object(Map::new()));
    }

    #[test]
    fn array_of_string_and_nested_array() {
        // ["a", []]
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x4000_0002u32.to_le_bytes()); // header, 2 elems
        buf.extend_from_slice(&0x0000_0001u32.to_le_bytes()); // string len 1
        buf.extend_from_slice(&0x5000_0004u32.to_le_bytes()); // container entry; length unused for recursion
        buf.push(b'a');
        buf.extend_from_slice(&[0, 0, 0]); // 3 padding bytes
        buf.extend_from_slice(&0x4000_0000u32.to_le_bytes()); // nested empty array

        let value = decode_at(&buf, 0).unwrap();
        assert_eq!(
            value,
            Value::Array(alloc::vec![
                Value::String("a".into()),
                Value::Array(Vec::new())
            ])
        );
    }

    #[test]
    fn object_pairs_keys_with_values() {
        // {"a": "b"}
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x2000_0001u32.to_le_bytes());
        buf.extend_from_slice(&0x0000_0001u32.to_le_bytes());
        buf.extend_from_slice(&0x0000_0001u32.to_le_bytes());
        buf.push(b'a');
        buf.push(b'b');

        let mut expected = Map::new();
        expected.insert("a".into(), Value::String("b".into()));
        assert_eq!(decode_at(&buf, 0).unwrap(), Value::Object(expected));
    }

    #[test]
    fn non_string_key_is_malformed() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x2000_0001u32.to_le_bytes());
        buf.extend_from_slice(&0x4000_0000u32.to_le_bytes()); // key slot: null, not string
        buf.extend_from_slice(&0x4000_0000u32.to_le_bytes()); // value slot: null
        match decode_at(&buf, 0) {
            Err(DecodeError::MalformedObject { .. }) => {}
            other => panic!("expected MalformedObject, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_code_is_bad_entry() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x4000_0001u32.to_le_bytes());
        buf.extend_from_slice(&0x6000_0000u32.to_le_bytes()); // type code 6: unused
        match decode_at(&buf, 0) {
            Err(DecodeError::BadEntry { .. }) => {}
            other => panic!("expected BadEntry, got {other:?}"),
        }
    }

    #[test]
    fn too_deep_nesting_is_rejected() {
        // Build N nested single-element arrays: [[[...[]...]]]
        fn build(depth: usize) -> Vec<u8> {
            if depth == 0 {
                return 0x4000_0000u32.to_le_bytes().to_vec();
            }
            let inner = build(depth - 1);
            let mut buf = Vec::new();
            buf.extend_from_slice(&0x4000_0001u32.to_le_bytes());
            let child_len = inner.len() as u32;
            buf.extend_from_slice(&(0x5000_0000u32 | child_len).to_le_bytes());
            buf.extend_from_slice(&inner);
            buf
        }

        let shallow = build(MAX_DEPTH - 1);
        assert!(decode_at(&shallow, 0).is_ok());

        let too_deep = build(MAX_DEPTH + 10);
        match decode_at(&too_deep, 0) {
            Err(DecodeError::TooDeep { .. }) => {}
            other => panic!("expected TooDeep, got {other:?}"),
        }
    }
}
