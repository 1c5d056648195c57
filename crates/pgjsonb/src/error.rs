//! Typed decode failures.
//!
//! Every variant carries the absolute byte offset at which the problem was
//! detected, to aid debugging a malformed buffer. There is no recovery or
//! partial-result path: a failed decode yields no value.

use alloc::string::String;

use thiserror::Error;

/// An error returned by [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A read would run past the end of the input buffer.
    #[error("truncated input at byte offset {offset}")]
    Truncated {
        /// Byte offset at which the out-of-bounds read was attempted.
        offset: usize,
    },

    /// The top-level `JContainer` header set neither `IS_ARRAY` nor
    /// `IS_OBJECT`, or set `IS_SCALAR` without a 1-element array.
    #[error("invalid root container header at byte offset {offset}")]
    BadRootHeader {
        /// Byte offset of the offending header (always 0 for the root).
        offset: usize,
    },

    /// A nested container's header set neither `IS_ARRAY` nor `IS_OBJECT`.
    #[error("invalid container header at byte offset {offset}")]
    BadHeader {
        /// Byte offset of the offending header.
        offset: usize,
    },

    /// A `JEntry`'s type bits did not identify a known type.
    #[error("unrecognized JEntry type code at byte offset {offset}")]
    BadEntry {
        /// Byte offset of the offending `JEntry` word.
        offset: usize,
    },

    /// An object's key `JEntry` was not of string type.
    #[error("object key at byte offset {offset} is not a string")]
    MalformedObject {
        /// Byte offset of the offending key `JEntry`'s value.
        offset: usize,
    },

    /// A string's bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string at byte offset {offset}: {detail}")]
    InvalidUtf8 {
        /// Byte offset at which the string's bytes begin.
        offset: usize,
        /// Human-readable detail from the underlying UTF-8 validation.
        detail: String,
    },

    /// A packed `numeric` value was malformed: an unrecognized sign, a
    /// negative digit count, or a digit/header span exceeding the buffer.
    #[error("malformed packed numeric at byte offset {offset}")]
    BadNumeric {
        /// Byte offset at which the numeric's varlena header begins.
        offset: usize,
    },

    /// Container nesting exceeded the recursion depth cap.
    #[error("container nesting exceeded the depth limit of {limit} at byte offset {offset}")]
    TooDeep {
        /// Byte offset of the container whose nesting tipped over the cap.
        offset: usize,
        /// The configured depth cap.
        limit: usize,
    },
}

impl DecodeError {
    /// The byte offset at which this error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            Self::Truncated { offset }
            | Self::BadRootHeader { offset }
            | Self::BadHeader { offset }
            | Self::BadEntry { offset }
            | Self::MalformedObject { offset }
            | Self::InvalidUtf8 { offset, .. }
            | Self::BadNumeric { offset }
            | Self::TooDeep { offset, .. } => offset,
        }
    }
}
