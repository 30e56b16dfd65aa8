//! Four-character register codes.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A 4-byte code addressing an SMC register or naming a register type.
///
/// Codes are packed big-endian from their 4 ASCII characters, so the
/// numeric order of two codes matches the lexicographic order of their
/// printable forms. A `FourCc` is the total identity of a register and is
/// immutable once constructed.
///
/// # Example
///
/// ```rust
/// use smckit_channel::FourCc;
///
/// let key = FourCc::from_bytes(*b"TC0P");
/// assert_eq!(key.to_string(), "TC0P");
/// assert_eq!(key.as_u32(), 0x5443_3050);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FourCc(u32);

impl FourCc {
    /// Creates a code from its 4 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    /// Creates a code from its packed numeric form.
    #[must_use]
    pub const fn from_u32(code: u32) -> Self {
        Self(code)
    }

    /// Returns the packed numeric form.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the 4 raw bytes of the code.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.to_bytes() {
            let c = if (0x20..0x7f).contains(&byte) {
                byte as char
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`FourCc`] from a string fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("four-character code must be exactly 4 ASCII characters, got {input:?}")]
pub struct InvalidFourCc {
    /// The rejected input.
    pub input: String,
}

impl FromStr for FourCc {
    type Err = InvalidFourCc;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if s.is_ascii() && bytes.len() == 4 {
            Ok(Self::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        } else {
            Err(InvalidFourCc {
                input: s.to_string(),
            })
        }
    }
}
