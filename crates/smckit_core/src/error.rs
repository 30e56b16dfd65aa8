//! Error types for the core crate.

use smckit_channel::{ChannelError, FourCc};
use smckit_codec::CodecError;
use thiserror::Error;

/// Result type for core operations.
pub type SmcResult<T> = Result<T, SmcError>;

/// Errors that can occur during SMC operations.
///
/// Failures are judged on two levels: the transport status of the driver
/// call and the controller status byte carried in the reply. A transport
/// permission failure maps to [`SmcError::NotPrivileged`] regardless of
/// any controller code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmcError {
    /// The controller has no register with this key.
    #[error("key {key} not found")]
    KeyNotFound {
        /// The key that was requested.
        key: FourCc,
    },

    /// The call requires elevated privileges.
    #[error("not privileged: elevated access required")]
    NotPrivileged,

    /// The value's declared type or size does not match the register.
    #[error("data type mismatch for key {key}")]
    DataTypeMismatch {
        /// The key whose register was targeted.
        key: FourCc,
    },

    /// A raw payload's length does not match the register's declared size.
    #[error("invalid data size for key {key}: register holds {expected} bytes, got {actual}")]
    InvalidDataSize {
        /// The key whose register was targeted.
        key: FourCc,
        /// The register's declared size.
        expected: u32,
        /// The length supplied by the caller or reported on the wire.
        actual: u32,
    },

    /// A register holds bytes that are not an ASCII string, or the input
    /// string is not ASCII.
    #[error("key {key} does not carry ASCII string data")]
    InvalidStringData {
        /// The key whose register was targeted.
        key: FourCc,
    },

    /// Opening the connection to the SMC service failed.
    #[error("connecting to the SMC service failed")]
    ConnectFailed(#[source] ChannelError),

    /// Releasing the connection to the SMC service failed.
    #[error("disconnecting from the SMC service failed")]
    DisconnectFailed(#[source] ChannelError),

    /// The facade has been closed.
    #[error("SMC facade is closed")]
    Closed,

    /// Encoding or decoding a typed value failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A driver call failed with an unclassified status combination.
    #[error("driver call for key {key} failed: kern {kern:#010x}, smc result {smc:#04x}")]
    Unknown {
        /// The key whose register was targeted.
        key: FourCc,
        /// The transport status code.
        kern: i32,
        /// The controller status byte.
        smc: u8,
    },

    /// Key enumeration failed while resolving a table index.
    #[error("key lookup failed at index {index}: kern {kern:#010x}, smc result {smc:#04x}")]
    IndexLookupFailed {
        /// The table index whose lookup failed.
        index: u32,
        /// The transport status code.
        kern: i32,
        /// The controller status byte.
        smc: u8,
    },
}
