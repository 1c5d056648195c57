//! A decoder for PostgreSQL's on-disk `jsonb` binary representation.
//!
//! `jsonb` values reach client code as an opaque byte buffer, typically
//! the payload of a `jsonb::bytea` cast. This crate turns that buffer into
//! a [`Value`] tree without speaking any wire protocol itself: encoding,
//! schema validation, and streaming/partial input are all out of scope
//! (see the crate's `SPEC_FULL.md` for the full rationale).
//!
//! The format interleaves two header words, [`bits::JContainer`] for
//! arrays/objects and `JEntry` for their children, with a packed decimal
//! representation for `numeric` values; see [`container`] and [`numeric`]
//! for the two subsystems that do the real work.
//!
//! # Examples
//!
//! ```
//! use pgjsonb::{decode, Value};
//!
//! let bytes = 0x2000_0000u32.to_le_bytes(); // empty object
//! assert_eq!(decode(&bytes).unwrap(), Value::Object(Default::default()));
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "serde", feature = "fuzzing"))]
extern crate std;

mod align;
mod bits;
mod container;
mod decode;
mod error;
mod numeric;
mod strings;
#[cfg(any(test, feature = "fuzzing"))]
pub mod testutil;
mod value;

pub use decode::decode;
pub use error::DecodeError;
pub use value::{Array, Map, Number, Value};
