//! Error types for channel operations.

use thiserror::Error;

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Transport status: success.
pub const KERN_SUCCESS: i32 = 0;
/// Transport status: caller lacks the privilege for the call.
pub const KERN_NOT_PRIVILEGED: i32 = 0xE000_02C1_u32 as i32;
/// Transport status: no such service or object.
pub const KERN_NOT_FOUND: i32 = 0xE000_02F0_u32 as i32;
/// Transport status: the connection is not open.
pub const KERN_NOT_OPEN: i32 = 0xE000_02CD_u32 as i32;

/// Transport-level failures reported by a driver channel.
///
/// Controller-level failures are not errors at this layer; they ride back
/// in the status byte of the returned record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The SMC service is not present on this machine.
    #[error("SMC service not found")]
    ServiceNotFound,

    /// The call requires elevated privileges.
    #[error("not privileged: elevated access required")]
    NotPrivileged,

    /// The channel is not open.
    #[error("channel is closed")]
    Closed,

    /// Any other transport failure, by raw status code.
    #[error("transport failure: kern return {code:#010x}")]
    Transport {
        /// The raw transport status code.
        code: i32,
    },
}

impl ChannelError {
    /// Returns the transport status code corresponding to this failure.
    #[must_use]
    pub const fn kern_return(&self) -> i32 {
        match self {
            Self::ServiceNotFound => KERN_NOT_FOUND,
            Self::NotPrivileged => KERN_NOT_PRIVILEGED,
            Self::Closed => KERN_NOT_OPEN,
            Self::Transport { code } => *code,
        }
    }
}
