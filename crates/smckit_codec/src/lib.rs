//! # smckit Codec
//!
//! Typed value encoding/decoding for SMC registers.
//!
//! Every register payload is a fixed 32-byte record holding a value whose
//! real width and interpretation come from the register's type descriptor.
//! This crate maps Rust types onto those payloads:
//!
//! - Integers and floats transcribe little-endian into the leading bytes
//! - `bool` maps to the one-byte `flag` type, nonzero meaning `true`
//! - [`BigEndian`] adapts any fixed-width value to a big-endian register
//!
//! Encoding is total for the built-in types; the `Result` surface exists
//! for adapters and downstream implementations that can reject a payload.
//!
//! ## Usage
//!
//! ```
//! use smckit_codec::SmcValue;
//!
//! let bytes = 3209_u32.encode().unwrap();
//! assert_eq!(&bytes[..4], &[0x89, 0x0C, 0x00, 0x00]);
//! assert_eq!(u32::decode(&bytes).unwrap(), 3209);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod endian;
mod error;
mod primitive;

pub use endian::BigEndian;
pub use error::{CodecError, CodecResult};

use smckit_channel::{FourCc, SmcBytes};

/// A value with a fixed register representation.
///
/// Implementors declare the four-character type descriptor and payload
/// width that identify them on the wire, and transcribe themselves to and
/// from the leading `DATA_SIZE` bytes of a record. Bytes past `DATA_SIZE`
/// are zero on encode and ignored on decode.
pub trait SmcValue: Sized {
    /// The four-character type descriptor this value matches.
    const DATA_TYPE: FourCc;

    /// The payload width in bytes.
    const DATA_SIZE: u32;

    /// Decodes a value from a register payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot represent this type.
    fn decode(bytes: &SmcBytes) -> CodecResult<Self>;

    /// Encodes this value into a register payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in a record.
    fn encode(&self) -> CodecResult<SmcBytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_recovers_value() {
        let bytes = 42_u16.encode().unwrap();
        assert_eq!(u16::decode(&bytes).unwrap(), 42);
    }

    #[test]
    fn big_endian_adapter_swaps_wire_order() {
        let le = 3209_u32.encode().unwrap();
        let be = BigEndian::new(3209_u32).encode().unwrap();
        assert_eq!(&le[..4], &[0x89, 0x0C, 0x00, 0x00]);
        assert_eq!(&be[..4], &[0x00, 0x00, 0x0C, 0x89]);
    }
}
