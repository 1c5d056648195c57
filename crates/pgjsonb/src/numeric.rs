//! Decoder for PostgreSQL's packed `numeric` on-disk representation.
//!
//! A `numeric` embedded in a `jsonb` value is stored as a 4-byte varlena
//! header followed by `ndigits` base-10000 digit words, preceded by
//! whatever padding is needed to align the varlena header itself to 4
//! bytes. None of this is specific to `jsonb`: it is PostgreSQL's general
//! on-disk `numeric` layout, referenced here rather than reimplemented.

use alloc::vec::Vec;

use crate::{
    align::pad4,
    error::DecodeError,
    value::Number,
};

const NUMERIC_POS_NAN: u16 = 0xC000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_POS: u16 = 0x0000;

fn read_i16_le(buf: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u16_le(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

/// Decodes the packed `numeric` entry whose `JEntry` span is `[pos, pos +
/// len)`. `pos` need not itself be 4-byte aligned: the varlena header is
/// assumed to start at the next 4-byte boundary at or after `pos`.
pub(crate) fn decode_numeric(buf: &[u8], pos: usize, len: usize) -> Result<Number, DecodeError> {
    let bad = || DecodeError::BadNumeric { offset: pos };

    let end = pos.checked_add(len).ok_or_else(bad)?;
    if end > buf.len() {
        return Err(bad());
    }

    // Skip the padding that aligns the varlena header, then the header
    // itself (4 bytes we have no use for: its length field is redundant
    // with the JEntry's).
    let payload = pos
        .checked_add(pad4(pos))
        .and_then(|v| v.checked_add(4))
        .ok_or_else(bad)?;
    if payload.checked_add(8).ok_or_else(bad)? > end {
        return Err(bad());
    }

    let ndigits_raw = read_i16_le(buf, payload);
    if ndigits_raw < 0 {
        return Err(bad());
    }
    let ndigits = ndigits_raw as usize;
    let weight = read_i16_le(buf, payload + 2);
    let sign = read_u16_le(buf, payload + 4);
    // dscale (payload + 6) records the display scale the server would use
    // when rendering this numeric; it does not affect the reconstructed
    // value here, only how many fractional digits a server-side formatter
    // would pad to.

    let digits_start = payload + 8;
    let digits_len_bytes = ndigits.checked_mul(2).ok_or_else(bad)?;
    let digits_end = digits_start.checked_add(digits_len_bytes).ok_or_else(bad)?;
    if digits_end > end {
        return Err(bad());
    }

    let sign_mult: i128 = match sign {
        NUMERIC_POS => 1,
        NUMERIC_NEG => -1,
        NUMERIC_POS_NAN => return Ok(Number::Float(f64::NAN)),
        _ => return Err(bad()),
    };

    let mut digits = Vec::with_capacity(ndigits);
    for i in 0..ndigits {
        let d = read_i16_le(buf, digits_start + i * 2);
        if !(0..=9999).contains(&d) {
            return Err(bad());
        }
        digits.push(d);
    }

    Ok(match exact_integer(&digits, weight, sign_mult) {
        Some(v) => Number::Int(v),
        None => Number::Float(approx_float(&digits, weight, sign_mult)),
    })
}

/// Attempts an exact `i128` reconstruction of `Σ digit[i] * 10000^(weight -
/// i)`. Returns `None` (fall back to a float) whenever the value has a
/// fractional component or the exact result overflows `i128`.
fn exact_integer(digits: &[i16], weight: i16, sign_mult: i128) -> Option<i128> {
    if digits.is_empty() {
        return Some(0);
    }

    // Exponent of the least significant digit; negative means a fractional
    // component is present and the value cannot be exact in this base.
    let e_last = i32::from(weight) - (digits.len() as i32 - 1);
    if e_last < 0 {
        return None;
    }

    // Horner's method over base-10000 digits, most significant first,
    // yields Σ digit[i] * 10000^(len-1-i); scale by 10000^e_last to shift
    // to the true exponents Σ digit[i] * 10000^(weight-i).
    let mut acc: i128 = 0;
    for &d in digits {
        acc = acc.checked_mul(10_000)?.checked_add(i128::from(d))?;
    }
    let scale = 10_000i128.checked_pow(u32::try_from(e_last).ok()?)?;
    acc.checked_mul(scale)?.checked_mul(sign_mult)
}

/// Floating-point reconstruction of `Σ digit[i] * 10000^(weight - i)`, used
/// whenever [`exact_integer`] can't produce an exact result.
fn approx_float(digits: &[i16], weight: i16, sign_mult: i128) -> f64 {
    let mut total = 0f64;
    for (i, &d) in digits.iter().enumerate() {
        let exp = i32::from(weight) - i as i32;
        total += f64::from(d) * 10_000f64.powi(exp);
    }
    total * sign_mult as f64
}
