//! # smckit Channel
//!
//! Driver-channel ABI and channel implementations for smckit.
//!
//! This crate defines the lowest-level interface to the SMC: the 4-byte
//! register codes, the fixed-layout record exchanged with the kernel driver,
//! the controller status bytes, and the [`DriverChannel`] trait that the
//! rest of smckit is written against.
//!
//! ## Design Principles
//!
//! - Channels are **opaque synchronous RPC primitives**: one fixed-size
//!   record in, one fixed-size record out.
//! - Channels do not interpret register values; typed access lives in
//!   `smckit_codec` and `smckit_core`.
//! - A channel handle is owned by a single logical operation at a time;
//!   serialization is the caller's responsibility.
//!
//! ## Available Channels
//!
//! - [`SimChannel`] - Simulated controller for testing
//! - [`IoKitChannel`] - Real controller access via IOKit (macOS only)
//!
//! ## Example
//!
//! ```rust
//! use smckit_channel::{Command, DriverChannel, FourCc, KeyData, SimChannel};
//!
//! let mut chan = SimChannel::with_keys(&[
//!     (FourCc::from_bytes(*b"TC0P"), FourCc::from_bytes(*b"ui16"), &[0x2a, 0x00]),
//! ]);
//! chan.open().unwrap();
//!
//! let mut input = KeyData::default();
//! input.key = FourCc::from_bytes(*b"TC0P");
//! input.data8 = Command::ReadKeyInfo.selector();
//! let reply = chan.call(&input).unwrap();
//! assert_eq!(reply.key_info.data_size, 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod channel;
mod error;
mod fourcc;
#[cfg(target_os = "macos")]
#[allow(unsafe_code)]
mod iokit;
mod sim;
mod wire;

pub use channel::DriverChannel;
pub use error::{
    ChannelError, ChannelResult, KERN_NOT_FOUND, KERN_NOT_OPEN, KERN_NOT_PRIVILEGED, KERN_SUCCESS,
};
pub use fourcc::{FourCc, InvalidFourCc};
#[cfg(target_os = "macos")]
pub use iokit::IoKitChannel;
pub use sim::{CallCounts, CounterHandle, SimChannel};
pub use wire::{
    Command, KeyData, KeyInfo, KeyVers, PLimitData, SmcBytes, DATA_LEN, KEY_COUNT, SMC_DATA_TYPE_MISMATCH,
    SMC_ERROR, SMC_KEY_NOT_FOUND, SMC_SUCCESS,
};
