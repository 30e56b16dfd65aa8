//! # smckit Core
//!
//! Typed, cached access to the SMC key-value register space.
//!
//! This crate provides:
//! - [`Smc`], the access facade owning the driver channel and the cache
//! - [`KeyInfoCache`], the per-key type-descriptor cache
//! - The read/write transaction protocol on top of raw driver calls
//! - [`SmcError`], the core error type
//!
//! Registers are addressed by 4-byte codes and hold up to 32 bytes whose
//! layout is described by a separately-queried type descriptor. The
//! descriptor for each key is fetched once and cached for the life of the
//! facade; typed reads and writes are validated against it before any
//! driver traffic.
//!
//! ## Usage
//!
//! ```
//! use smckit_channel::{FourCc, SimChannel};
//! use smckit_core::Smc;
//!
//! let sim = SimChannel::with_keys(&[
//!     (FourCc::from_bytes(*b"F0Ac"), FourCc::from_bytes(*b"ui16"), &[0x84, 0x03]),
//! ]);
//! let smc = Smc::with_channel(Box::new(sim));
//!
//! let rpm: u16 = smc.read(FourCc::from_bytes(*b"F0Ac")).unwrap();
//! assert_eq!(rpm, 900);
//! assert!(smc.is_key_found(FourCc::from_bytes(*b"F0Ac")).unwrap());
//! ```
//!
//! On macOS, [`Smc::new`] connects to the real controller through IOKit;
//! everywhere else, inject a channel with [`Smc::with_channel`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod error;
mod protocol;
mod smc;

pub use cache::KeyInfoCache;
pub use error::{SmcError, SmcResult};
pub use smc::Smc;

pub use smckit_channel::{ChannelError, DriverChannel, FourCc, KeyInfo, KEY_COUNT};
pub use smckit_codec::{BigEndian, CodecError, SmcValue};
