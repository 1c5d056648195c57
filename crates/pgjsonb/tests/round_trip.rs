//! Property tests against a real PostgreSQL connection aren't available in
//! this suite, so these exercise the round-trip and totality properties through
//! [`pgjsonb::testutil`]'s generator/encoder pair instead.

mod common;

use pgjsonb::{decode, testutil::encode, DecodeError, Number, Value};
use quickcheck_macros::quickcheck;

use common::assert_approx_eq;

/// Property 1 (round-trip equivalence) and property 5 (scalar wrapping):
/// every generated document survives an encode/decode cycle unchanged.
#[quickcheck]
fn round_trip_equivalence(value: Value) -> bool {
    decode(&encode(&value)).as_ref() == Ok(&value)
}

/// Property 2 (numeric approximation): a wide magnitude that overflows
/// `i128` falls back to a float within the required relative tolerance
/// rather than wrapping or erroring.
#[test]
fn numeric_overflow_falls_back_to_float() {
    // digits chosen so the reconstructed magnitude exceeds i128::MAX.
    let digits: [i16; 13] = [
        1234, 5678, 9012, 3456, 7890, 1234, 5678, 9012, 3456, 7890, 1234, 5678, 9012,
    ];
    let weight = (digits.len() as i16) - 1;

    let mut payload = Vec::new();
    payload.extend_from_slice(&[0u8; 4]);
    payload.extend_from_slice(&(digits.len() as i16).to_le_bytes());
    payload.extend_from_slice(&weight.to_le_bytes());
    payload.extend_from_slice(&0x0000u16.to_le_bytes());
    payload.extend_from_slice(&0u16.to_le_bytes());
    for d in &digits {
        payload.extend_from_slice(&d.to_le_bytes());
    }

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x5000_0001u32.to_le_bytes());
    bytes.extend_from_slice(&(0x1000_0000u32 | payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&payload);

    let mut expected = 0f64;
    for (i, &d) in digits.iter().enumerate() {
        let exp = i32::from(weight) - i as i32;
        expected += f64::from(d) * 10_000f64.powi(exp);
    }

    match decode(&bytes).unwrap() {
        Value::Number(Number::Float(f)) => assert_approx_eq(f, expected),
        other => panic!("expected a float approximation, got {other:?}"),
    }
}

/// Property 3: `decode` is total over arbitrary bytes; it always returns
/// either a value or a typed error, never panicking.
#[quickcheck]
fn total_on_arbitrary_bytes(bytes: Vec<u8>) -> bool {
    matches!(decode(&bytes), Ok(_) | Err(_))
}

/// Property 4 (depth safety): nesting well below the 1000-deep cap succeeds,
/// nesting well beyond it is rejected with `TooDeep`.
#[test]
fn depth_safety() {
    let shallow = nested_array(900);
    assert!(decode(&encode(&shallow)).is_ok());

    let deep = nested_array(1_500);
    match decode(&encode(&deep)) {
        Err(DecodeError::TooDeep { .. }) => {}
        other => panic!("expected TooDeep, got {other:?}"),
    }
}

fn nested_array(depth: usize) -> Value {
    let mut v = Value::Array(Vec::new());
    for _ in 0..depth {
        v = Value::Array(vec![v]);
    }
    v
}
