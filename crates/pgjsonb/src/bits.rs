//! Pure bit-field decoders for the two 32-bit header words used by the
//! on-disk `jsonb` format: `JEntry` (one per container child) and
//! `JContainer` (one per array/object).
//!
//! These functions never fail: they are total over every possible `u32`.
//! Whether the extracted fields make sense (an unknown type code, a
//! container with neither the array nor object flag set) is for callers in
//! [`crate::container`] to judge.

/// Mask over the low 28 bits of a `JEntry` word: either a length or an
/// offset-of-end relative to the container's values area, depending on
/// [`JEntry::has_off`].
const JENTRY_OFFLENMASK: u32 = 0x0FFF_FFFF;
/// Mask isolating the 3-bit type code of a `JEntry`, still in-place at bits
/// 28–30 (use [`JEntry::type_code`] rather than masking this directly).
const JENTRY_TYPEMASK: u32 = 0x7000_0000;
/// Flag bit: the offset/length field holds an offset-of-end rather than a
/// plain length.
const JENTRY_HAS_OFF: u32 = 0x8000_0000;

/// The type code carried by a [`JEntry`], decoded from bits 28–30.
///
/// `6` and `7` are not assigned by the format; they decode to
/// [`JEntryType::Unknown`] rather than failing, since bit decoding is total.
/// Whether an unknown type code is an error is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JEntryType {
    String,
    Numeric,
    BoolFalse,
    BoolTrue,
    Null,
    Container,
    Unknown(u8),
}

impl JEntryType {
    fn from_code(code: u8) -> Self {
        match code {
            0 => Self::String,
            1 => Self::Numeric,
            2 => Self::BoolFalse,
            3 => Self::BoolTrue,
            4 => Self::Null,
            5 => Self::Container,
            other => Self::Unknown(other),
        }
    }
}

/// A decoded `JEntry` header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JEntry {
    pub(crate) kind: JEntryType,
    /// The raw low-28-bit field: a length, or (if `has_off`) an
    /// offset-of-end relative to the values area.
    pub(crate) offlen: u32,
    pub(crate) has_off: bool,
}

impl JEntry {
    /// Decodes a raw `JEntry` word. Total: every `u32` decodes to some
    /// `JEntry`.
    pub(crate) fn decode(word: u32) -> Self {
        let code = ((word & JENTRY_TYPEMASK) >> 28) as u8;
        Self {
            kind: JEntryType::from_code(code),
            offlen: word & JENTRY_OFFLENMASK,
            has_off: word & JENTRY_HAS_OFF != 0,
        }
    }
}

/// Mask over the low 28 bits of a `JContainer` word: the element count.
const JB_CMASK: u32 = 0x0FFF_FFFF;
/// Flag: the root container wraps a single scalar document as a 1-element
/// array.
const JB_FSCALAR: u32 = 0x1000_0000;
const JB_FOBJECT: u32 = 0x2000_0000;
const JB_FARRAY: u32 = 0x4000_0000;

/// A decoded `JContainer` header word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JContainer {
    pub(crate) count: u32,
    pub(crate) is_scalar: bool,
    pub(crate) is_object: bool,
    pub(crate) is_array: bool,
}

impl JContainer {
    /// Decodes a raw `JContainer` word. Total, like [`JEntry::decode`]:
    /// callers must separately validate that exactly one of `is_array` /
    /// `is_object` is set.
    pub(crate) fn decode(word: u32) -> Self {
        Self {
            count: word & JB_CMASK,
            is_scalar: word & JB_FSCALAR != 0,
            is_object: word & JB_FOBJECT != 0,
            is_array: word & JB_FARRAY != 0,
        }
    }
}
