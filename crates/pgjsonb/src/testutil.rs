//! Test-only support: a random [`Value`] generator and an encoder that packs
//! a `Value` into the exact on-disk byte layout [`crate::decode`] expects.
//!
//! There is no live PostgreSQL connection available to this crate's test
//! suite, so this module stands in for "round-trip a document through a real
//! `jsonb::bytea` cast". It is compiled
//! for the crate's own `#[cfg(test)]` modules and, behind the `fuzzing`
//! feature, for the `tests/` integration suite and the `fuzz/` crate, which
//! uses it to mutate raw bytes into structurally valid buffers.
//!
//! This is deliberately not a public encoding API: it mirrors only as much
//! of PostgreSQL's on-disk format as is needed to produce inputs this crate
//! can decode, not a general-purpose `jsonb` writer.

use alloc::{string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

use crate::{
    align::pad4,
    value::{Map, Number, Value},
};

const JB_FARRAY: u32 = 0x4000_0000;
const JB_FOBJECT: u32 = 0x2000_0000;
const JB_FSCALAR: u32 = 0x1000_0000;

const JE_STRING: u32 = 0x0000_0000;
const JE_NUMERIC: u32 = 0x1000_0000;
const JE_BOOL_FALSE: u32 = 0x2000_0000;
const JE_BOOL_TRUE: u32 = 0x3000_0000;
const JE_NULL: u32 = 0x4000_0000;
const JE_CONTAINER: u32 = 0x5000_0000;
const JE_HAS_OFF: u32 = 0x8000_0000;

/// A container child: either one of an object's keys (always `STRING`
/// typed) or an array element / object value.
enum Child<'a> {
    Key(&'a str),
    Value(&'a Value),
}

/// Encodes `value` into the exact byte layout [`crate::decode`] reads.
///
/// Scalars are wrapped as a one-element `IS_SCALAR|IS_ARRAY` container, the
/// same way PostgreSQL stores a top-level scalar `jsonb` document.
#[must_use]
pub fn encode(value: &Value) -> Vec<u8> {
    match value {
        Value::Array(items) => {
            let header = JB_FARRAY | u32::try_from(items.len()).expect("test fixtures are small");
            encode_container(header, &items.iter().map(Child::Value).collect::<Vec<_>>())
        }
        Value::Object(map) => encode_object(map),
        scalar => {
            let header = JB_FARRAY | JB_FSCALAR | 1;
            encode_container(header, &[Child::Value(scalar)])
        }
    }
}

fn encode_object(map: &Map) -> Vec<u8> {
    // Real jsonb sorts keys by length then bytewise content; match that so
    // encoded fixtures look like genuine server output, even though the
    // decoder does not depend on the ordering.
    let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
    pairs.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let header = JB_FOBJECT | u32::try_from(pairs.len()).expect("test fixtures are small");
    let mut children: Vec<Child<'_>> = Vec::with_capacity(pairs.len() * 2);
    children.extend(pairs.iter().map(|(k, _)| Child::Key(k)));
    children.extend(pairs.iter().map(|(_, v)| Child::Value(v)));
    encode_container(header, &children)
}

fn encode_container(header: u32, children: &[Child<'_>]) -> Vec<u8> {
    let mut entries = Vec::with_capacity(children.len());
    let mut values = Vec::new();
    let mut voff: u32 = 0;

    for (i, child) in children.iter().enumerate() {
        let (kind, body) = encode_child(child, voff);
        let len = u32::try_from(body.len()).expect("test fixtures are small");
        values.extend_from_slice(&body);

        // Exercise HAS_OFF on roughly every third entry, the way the server
        // sparsely interleaves offsets among lengths; the decoder
        // must not depend on the exact stride.
        let raw = if i % 3 == 2 { voff + len } else { len };
        let has_off = if i % 3 == 2 { JE_HAS_OFF } else { 0 };
        entries.push(kind | has_off | raw);

        voff += len;
    }

    let mut buf = Vec::with_capacity(4 + entries.len() * 4 + values.len());
    buf.extend_from_slice(&header.to_le_bytes());
    for je in entries {
        buf.extend_from_slice(&je.to_le_bytes());
    }
    buf.extend_from_slice(&values);
    buf
}

/// Encodes one child, returning its JEntry type flag and the bytes that
/// belong in the values area (including any alignment padding the child
/// itself needs).
fn encode_child(child: &Child<'_>, voff: u32) -> (u32, Vec<u8>) {
    match child {
        Child::Key(k) => (JE_STRING, k.as_bytes().to_vec()),
        Child::Value(Value::String(s)) => (JE_STRING, s.as_bytes().to_vec()),
        Child::Value(Value::Null) => (JE_NULL, Vec::new()),
        Child::Value(Value::Bool(true)) => (JE_BOOL_TRUE, Vec::new()),
        Child::Value(Value::Bool(false)) => (JE_BOOL_FALSE, Vec::new()),
        Child::Value(Value::Number(n)) => {
            let pad = pad4(voff as usize);
            let mut body = alloc::vec![0u8; pad];
            body.extend_from_slice(&encode_numeric(n));
            (JE_NUMERIC, body)
        }
        Child::Value(nested @ (Value::Array(_) | Value::Object(_))) => {
            let pad = pad4(voff as usize);
            let mut body = alloc::vec![0u8; pad];
            body.extend_from_slice(&encode(nested));
            (JE_CONTAINER, body)
        }
    }
}

/// Packs a [`Number`] into a varlena header (bytes ignored by the decoder)
/// followed by the `ndigits`/`weight`/`sign`/`dscale` quartet and the
/// base-10000 digit words.
///
/// Only exact integers (and `NaN`) are supported: the generator in this
/// module never produces a fractional [`Number::Float`], and the fractional
/// and overflow cases are already covered by hand-built fixtures in
/// `numeric.rs`'s unit tests.
fn encode_numeric(n: &Number) -> Vec<u8> {
    let (sign_mult, magnitude): (i128, i128) = match *n {
        Number::Int(i) if i < 0 => (-1, -i),
        Number::Int(i) => (1, i),
        Number::Float(f) if f.is_nan() => {
            let mut body = alloc::vec![0u8; 4];
            body.extend_from_slice(&0i16.to_le_bytes());
            body.extend_from_slice(&0i16.to_le_bytes());
            body.extend_from_slice(&0xC000u16.to_le_bytes());
            body.extend_from_slice(&0u16.to_le_bytes());
            return body;
        }
        Number::Float(_) => panic!("encode_numeric only supports exact integers and NaN"),
    };

    let mut digits = Vec::new();
    let mut rem = magnitude;
    while rem > 0 {
        digits.push((rem % 10_000) as i16);
        rem /= 10_000;
    }
    digits.reverse();
    let weight = if digits.is_empty() {
        0
    } else {
        i16::try_from(digits.len() - 1).expect("test fixtures are small")
    };
    let sign: u16 = if sign_mult < 0 { 0x4000 } else { 0x0000 };

    let mut body = alloc::vec![0u8; 4]; // varlena header, ignored by the decoder
    let ndigits = i16::try_from(digits.len()).expect("test fixtures are small");
    body.extend_from_slice(&ndigits.to_le_bytes());
    body.extend_from_slice(&weight.to_le_bytes());
    body.extend_from_slice(&sign.to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes()); // dscale, not reconstructed
    for d in digits {
        body.extend_from_slice(&d.to_le_bytes());
    }
    body
}

/// Generates a random, bounded-depth JSON-ish [`Value`] tree, in the spirit
/// of the source project's `JsonFaker`: scalars are the common case, with a
/// shrinking chance of nesting another container as the budget runs down.
impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_with_budget(g, 4)
    }
}

fn arbitrary_with_budget(g: &mut Gen, budget: usize) -> Value {
    if budget == 0 || u8::arbitrary(g) % 3 != 0 {
        arbitrary_scalar(g)
    } else if bool::arbitrary(g) {
        let len = usize::from(u8::arbitrary(g) % 5);
        Value::Array((0..len).map(|_| arbitrary_with_budget(g, budget - 1)).collect())
    } else {
        let len = usize::from(u8::arbitrary(g) % 5);
        let mut map = Map::new();
        for _ in 0..len {
            map.insert(arbitrary_text(g), arbitrary_with_budget(g, budget - 1));
        }
        Value::Object(map)
    }
}

fn arbitrary_scalar(g: &mut Gen) -> Value {
    match u8::arbitrary(g) % 4 {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => Value::String(arbitrary_text(g)),
        // Keep generated numerics exact integers so round-trip comparison
        // can use plain equality instead of a tolerance.
        _ => Value::Number(Number::Int(i128::from(i64::arbitrary(g)))),
    }
}

/// Mostly printable ASCII, occasionally a codepoint outside the BMP, mirroring
/// the source project's `random_str`'s `unichance`.
fn arbitrary_text(g: &mut Gen) -> String {
    let len = usize::from(u8::arbitrary(g) % 12);
    let mut s = String::new();
    for _ in 0..len {
        if u8::arbitrary(g) % 5 == 0 {
            s.push(char::arbitrary(g));
        } else {
            s.push((u8::arbitrary(g) % 95 + 32) as char);
        }
    }
    s
}
