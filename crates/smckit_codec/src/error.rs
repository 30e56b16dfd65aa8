//! Error types for the codec crate.

use smckit_channel::FourCc;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The type's declared size does not fit in a register record.
    #[error("type {data_type} declares {data_size} bytes, larger than a register record")]
    OversizedType {
        /// The four-character type descriptor.
        data_type: FourCc,
        /// The declared size in bytes.
        data_size: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_type_display_names_the_type() {
        let err = CodecError::OversizedType {
            data_type: FourCc::from_bytes(*b"ch8*"),
            data_size: 64,
        };
        let text = err.to_string();
        assert!(text.contains("ch8*"));
        assert!(text.contains("64"));
    }
}
