//! Byte-order adapter for big-endian registers.
//!
//! Most registers store little-endian payloads, but a handful (the key
//! count among them) are big-endian. [`BigEndian`] wraps any fixed-width
//! [`SmcValue`] and reverses the payload bytes on both sides of the codec,
//! so `BigEndian<u32>` reads a big-endian 4-byte register into a native
//! `u32`.

use crate::SmcValue;
use crate::error::{CodecError, CodecResult};
use smckit_channel::{DATA_LEN, FourCc, SmcBytes};

/// A value whose register representation is big-endian.
///
/// The wrapper shares the inner type's descriptor and size; only the byte
/// order of the payload changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BigEndian<T>(T);

impl<T> BigEndian<T> {
    /// Wraps a native value for big-endian encoding.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Returns the native value.
    pub fn into_inner(self) -> T {
        self.0
    }

    /// Borrows the native value.
    pub const fn get(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for BigEndian<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: SmcValue> SmcValue for BigEndian<T> {
    const DATA_TYPE: FourCc = T::DATA_TYPE;
    const DATA_SIZE: u32 = T::DATA_SIZE;

    fn decode(bytes: &SmcBytes) -> CodecResult<Self> {
        let mut swapped = *bytes;
        reverse_payload(&mut swapped, T::DATA_TYPE, T::DATA_SIZE)?;
        T::decode(&swapped).map(Self)
    }

    fn encode(&self) -> CodecResult<SmcBytes> {
        let mut out = self.0.encode()?;
        reverse_payload(&mut out, T::DATA_TYPE, T::DATA_SIZE)?;
        Ok(out)
    }
}

fn reverse_payload(bytes: &mut SmcBytes, data_type: FourCc, data_size: u32) -> CodecResult<()> {
    let len = data_size as usize;
    if len > DATA_LEN {
        return Err(CodecError::OversizedType {
            data_type,
            data_size,
        });
    }
    bytes[..len].reverse();
    Ok(())
}
