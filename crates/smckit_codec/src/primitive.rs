//! [`SmcValue`] implementations for primitive register types.

use crate::SmcValue;
use crate::error::CodecResult;
use smckit_channel::{FourCc, SmcBytes};

macro_rules! impl_numeric {
    ($ty:ty, $tag:literal) => {
        impl SmcValue for $ty {
            const DATA_TYPE: FourCc = FourCc::from_bytes(*$tag);
            const DATA_SIZE: u32 = core::mem::size_of::<$ty>() as u32;

            fn decode(bytes: &SmcBytes) -> CodecResult<Self> {
                let mut buf = [0u8; core::mem::size_of::<$ty>()];
                buf.copy_from_slice(&bytes[..core::mem::size_of::<$ty>()]);
                Ok(Self::from_le_bytes(buf))
            }

            fn encode(&self) -> CodecResult<SmcBytes> {
                let mut out = [0u8; smckit_channel::DATA_LEN];
                out[..core::mem::size_of::<$ty>()].copy_from_slice(&self.to_le_bytes());
                Ok(out)
            }
        }
    };
}

impl_numeric!(u8, b"ui8 ");
impl_numeric!(u16, b"ui16");
impl_numeric!(u32, b"ui32");
impl_numeric!(u64, b"ui64");
impl_numeric!(i8, b"si8 ");
impl_numeric!(i16, b"si16");
impl_numeric!(i32, b"si32");
impl_numeric!(i64, b"si64");

// Bit-pattern transcription: the register carries the raw IEEE-754 bits.
impl_numeric!(f32, b"flt ");

impl SmcValue for bool {
    const DATA_TYPE: FourCc = FourCc::from_bytes(*b"flag");
    const DATA_SIZE: u32 = 1;

    /// Any nonzero first byte decodes as `true`.
    fn decode(bytes: &SmcBytes) -> CodecResult<Self> {
        Ok(bytes[0] != 0)
    }

    fn encode(&self) -> CodecResult<SmcBytes> {
        let mut out = [0u8; smckit_channel::DATA_LEN];
        out[0] = u8::from(*self);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smckit_channel::DATA_LEN;

    fn bytes_of(prefix: &[u8]) -> SmcBytes {
        let mut out = [0u8; DATA_LEN];
        out[..prefix.len()].copy_from_slice(prefix);
        out
    }

    #[test]
    fn type_descriptors_match_register_tags() {
        assert_eq!(u8::DATA_TYPE, FourCc::from_bytes(*b"ui8 "));
        assert_eq!(u16::DATA_TYPE, FourCc::from_bytes(*b"ui16"));
        assert_eq!(u32::DATA_TYPE, FourCc::from_bytes(*b"ui32"));
        assert_eq!(u64::DATA_TYPE, FourCc::from_bytes(*b"ui64"));
        assert_eq!(i8::DATA_TYPE, FourCc::from_bytes(*b"si8 "));
        assert_eq!(i16::DATA_TYPE, FourCc::from_bytes(*b"si16"));
        assert_eq!(i32::DATA_TYPE, FourCc::from_bytes(*b"si32"));
        assert_eq!(i64::DATA_TYPE, FourCc::from_bytes(*b"si64"));
        assert_eq!(f32::DATA_TYPE, FourCc::from_bytes(*b"flt "));
        assert_eq!(bool::DATA_TYPE, FourCc::from_bytes(*b"flag"));
    }

    #[test]
    fn declared_sizes_match_widths() {
        assert_eq!(u8::DATA_SIZE, 1);
        assert_eq!(u16::DATA_SIZE, 2);
        assert_eq!(u32::DATA_SIZE, 4);
        assert_eq!(u64::DATA_SIZE, 8);
        assert_eq!(f32::DATA_SIZE, 4);
        assert_eq!(bool::DATA_SIZE, 1);
    }

    #[test]
    fn u16_encodes_little_endian() {
        let out = 0x1234_u16.encode().unwrap();
        assert_eq!(&out[..2], &[0x34, 0x12]);
        assert!(out[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn u32_decodes_little_endian() {
        let value = u32::decode(&bytes_of(&[0x89, 0x0C, 0x00, 0x00])).unwrap();
        assert_eq!(value, 3209);
    }

    #[test]
    fn i16_roundtrips_negative() {
        let out = (-2_i16).encode().unwrap();
        assert_eq!(&out[..2], &[0xFE, 0xFF]);
        assert_eq!(i16::decode(&out).unwrap(), -2);
    }

    #[test]
    fn f32_transcribes_bit_pattern() {
        let out = 1.0_f32.encode().unwrap();
        assert_eq!(&out[..4], &0x3F80_0000_u32.to_le_bytes());
        let back = f32::decode(&out).unwrap();
        assert_eq!(back.to_bits(), 1.0_f32.to_bits());
    }

    #[test]
    fn bool_treats_any_nonzero_as_true() {
        assert!(!bool::decode(&bytes_of(&[0x00])).unwrap());
        assert!(bool::decode(&bytes_of(&[0x01])).unwrap());
        assert!(bool::decode(&bytes_of(&[0x7F])).unwrap());
    }

    #[test]
    fn bool_encodes_single_byte() {
        assert_eq!(true.encode().unwrap()[0], 1);
        assert_eq!(false.encode().unwrap()[0], 0);
    }

    proptest! {
        #[test]
        fn u32_roundtrips(value in any::<u32>()) {
            let out = value.encode().unwrap();
            prop_assert_eq!(u32::decode(&out).unwrap(), value);
            prop_assert!(out[4..].iter().all(|&b| b == 0));
        }

        #[test]
        fn u64_roundtrips(value in any::<u64>()) {
            let out = value.encode().unwrap();
            prop_assert_eq!(u64::decode(&out).unwrap(), value);
        }

        #[test]
        fn i64_roundtrips(value in any::<i64>()) {
            let out = value.encode().unwrap();
            prop_assert_eq!(i64::decode(&out).unwrap(), value);
        }

        #[test]
        fn f32_roundtrips_by_bits(value in any::<f32>()) {
            let out = value.encode().unwrap();
            prop_assert_eq!(f32::decode(&out).unwrap().to_bits(), value.to_bits());
        }
    }
}
