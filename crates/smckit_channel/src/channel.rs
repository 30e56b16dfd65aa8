//! Driver channel trait definition.

use crate::error::ChannelResult;
use crate::wire::KeyData;

/// A synchronous request/response channel to the SMC driver.
///
/// Channels are **opaque RPC primitives**. Each call round-trips one
/// fixed-size [`KeyData`] record; the channel does not interpret register
/// values or sequence multi-step operations.
///
/// # Invariants
///
/// - `call` is a bounded synchronous round-trip; it never blocks
///   indefinitely and never retries.
/// - `call` returns `Err` only for transport-level failures. A completed
///   round-trip whose controller status byte reports a failure is still
///   `Ok`; judging the two status levels belongs to the caller.
/// - A channel handle must not be used by two logical operations at once;
///   callers serialize access.
///
/// # Implementors
///
/// - [`super::SimChannel`] - For testing
/// - `IoKitChannel` - For real controller access (macOS only)
pub trait DriverChannel: Send {
    /// Opens the connection to the driver.
    ///
    /// Opening an already-open channel is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is absent or the connection is
    /// refused.
    fn open(&mut self) -> ChannelResult<()>;

    /// Closes the connection.
    ///
    /// Closing a channel that is not open is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the release.
    fn close(&mut self) -> ChannelResult<()>;

    /// Issues one command and returns the driver's reply record.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is not open or the transport fails.
    fn call(&mut self, input: &KeyData) -> ChannelResult<KeyData>;
}
