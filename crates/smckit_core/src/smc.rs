//! SMC access facade.

use crate::cache::KeyInfoCache;
use crate::error::{SmcError, SmcResult};
use crate::protocol;
use parking_lot::Mutex;
use smckit_channel::{ChannelError, DriverChannel, FourCc, KeyInfo, DATA_LEN, KEY_COUNT};
use smckit_codec::{BigEndian, SmcValue};
use tracing::debug;

struct ChannelState {
    chan: Box<dyn DriverChannel>,
    open: bool,
    closed: bool,
}

/// The main SMC handle.
///
/// `Smc` is the primary entry point for reading and writing registers.
/// It owns the driver channel and the key-info cache, opens the channel
/// lazily on the first operation that needs it, and serializes channel
/// access so each logical operation runs alone.
///
/// Cache hits never touch the channel, so a `key_info` lookup for an
/// already-seen key completes even while another thread holds the channel
/// for a transaction.
///
/// # Example
///
/// ```rust
/// use smckit_channel::{FourCc, SimChannel};
/// use smckit_core::Smc;
///
/// let sim = SimChannel::with_keys(&[
///     (FourCc::from_bytes(*b"TC0P"), FourCc::from_bytes(*b"ui16"), &[0x2a, 0x00]),
/// ]);
/// let smc = Smc::with_channel(Box::new(sim));
/// let value: u16 = smc.read(FourCc::from_bytes(*b"TC0P")).unwrap();
/// assert_eq!(value, 0x2a);
/// ```
pub struct Smc {
    state: Mutex<ChannelState>,
    cache: KeyInfoCache,
}

impl Smc {
    /// Creates a facade over the real controller.
    ///
    /// The connection is not established until the first operation.
    #[cfg(target_os = "macos")]
    #[must_use]
    pub fn new() -> Self {
        Self::with_channel(Box::new(smckit_channel::IoKitChannel::new()))
    }

    /// Creates a facade over an injected channel.
    #[must_use]
    pub fn with_channel(chan: Box<dyn DriverChannel>) -> Self {
        Self {
            state: Mutex::new(ChannelState {
                chan,
                open: false,
                closed: false,
            }),
            cache: KeyInfoCache::new(),
        }
    }

    fn ensure_open(state: &mut ChannelState) -> SmcResult<()> {
        if state.closed {
            return Err(SmcError::Closed);
        }
        if state.open {
            return Ok(());
        }
        match state.chan.open() {
            Ok(()) => {
                state.open = true;
                debug!("SMC channel opened");
                Ok(())
            }
            Err(ChannelError::NotPrivileged) => Err(SmcError::NotPrivileged),
            Err(err) => Err(SmcError::ConnectFailed(err)),
        }
    }

    /// Resolves a key's descriptor with the channel already locked,
    /// re-checking the cache so concurrent misses collapse into one
    /// driver call.
    fn key_info_locked(&self, state: &mut ChannelState, key: FourCc) -> SmcResult<KeyInfo> {
        if let Some(info) = self.cache.lookup(key) {
            return Ok(info);
        }
        Self::ensure_open(state)?;
        let info = protocol::read_key_info(state.chan.as_mut(), key)?;
        debug!(%key, size = info.data_size, %info.data_type, "cached key info");
        self.cache.insert(key, info);
        Ok(info)
    }

    /// Returns the type descriptor for `key`, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::KeyNotFound`] if the controller has no such
    /// register; not-found outcomes are never cached.
    pub fn key_info(&self, key: FourCc) -> SmcResult<KeyInfo> {
        if let Some(info) = self.cache.lookup(key) {
            return Ok(info);
        }
        let mut state = self.state.lock();
        self.key_info_locked(&mut state, key)
    }

    /// Reads the register at `key` as a typed value.
    ///
    /// The register's declared size must equal `T::DATA_SIZE`; on
    /// mismatch the read fails without touching the driver.
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::DataTypeMismatch`] on a size mismatch and
    /// [`SmcError::Codec`] if the payload cannot be decoded.
    pub fn read<T: SmcValue>(&self, key: FourCc) -> SmcResult<T> {
        let mut state = self.state.lock();
        let info = self.key_info_locked(&mut state, key)?;
        if info.data_size != T::DATA_SIZE {
            return Err(SmcError::DataTypeMismatch { key });
        }
        let bytes = protocol::read_key(state.chan.as_mut(), key, info)?;
        drop(state);
        Ok(T::decode(&bytes)?)
    }

    /// Writes a typed value to the register at `key`.
    ///
    /// The register's declared size and type tag must both match `T`; on
    /// mismatch the write fails without issuing a driver write.
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::DataTypeMismatch`] on a descriptor mismatch.
    pub fn write<T: SmcValue>(&self, key: FourCc, value: &T) -> SmcResult<()> {
        let bytes = value.encode()?;
        let mut state = self.state.lock();
        let info = self.key_info_locked(&mut state, key)?;
        if info.data_size != T::DATA_SIZE || info.data_type != T::DATA_TYPE {
            return Err(SmcError::DataTypeMismatch { key });
        }
        protocol::write_key(state.chan.as_mut(), key, info, bytes)
    }

    /// Reads the register at `key` as raw bytes, exactly as many as its
    /// descriptor declares.
    pub fn read_bytes(&self, key: FourCc) -> SmcResult<Vec<u8>> {
        let mut state = self.state.lock();
        let info = self.key_info_locked(&mut state, key)?;
        let bytes = protocol::read_key(state.chan.as_mut(), key, info)?;
        drop(state);
        let len = (info.data_size as usize).min(DATA_LEN);
        Ok(bytes[..len].to_vec())
    }

    /// Writes raw bytes to the register at `key`.
    ///
    /// `data` must be exactly the register's declared size.
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::InvalidDataSize`] if the length differs from
    /// the descriptor.
    pub fn write_bytes(&self, key: FourCc, data: &[u8]) -> SmcResult<()> {
        let mut state = self.state.lock();
        let info = self.key_info_locked(&mut state, key)?;
        if data.len() as u32 != info.data_size || data.len() > DATA_LEN {
            return Err(SmcError::InvalidDataSize {
                key,
                expected: info.data_size,
                actual: data.len() as u32,
            });
        }
        let mut bytes = [0u8; DATA_LEN];
        bytes[..data.len()].copy_from_slice(data);
        protocol::write_key(state.chan.as_mut(), key, info, bytes)
    }

    /// Reads the register at `key` as an ASCII string, trimmed at the
    /// first zero byte.
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::InvalidStringData`] if the payload is not
    /// ASCII.
    pub fn read_string(&self, key: FourCc) -> SmcResult<String> {
        let mut state = self.state.lock();
        let info = self.key_info_locked(&mut state, key)?;
        let bytes = protocol::read_key(state.chan.as_mut(), key, info)?;
        drop(state);
        protocol::decode_string(key, info, &bytes)
    }

    /// Writes an ASCII string to the register at `key`, zero-padded to
    /// the register's declared size.
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::InvalidStringData`] for non-ASCII input and
    /// [`SmcError::InvalidDataSize`] if the string exceeds the register.
    pub fn write_string(&self, key: FourCc, text: &str) -> SmcResult<()> {
        let mut state = self.state.lock();
        let info = self.key_info_locked(&mut state, key)?;
        let bytes = protocol::encode_string(key, info, text)?;
        protocol::write_key(state.chan.as_mut(), key, info, bytes)
    }

    /// Returns whether the controller has a register at `key`.
    ///
    /// Only [`SmcError::KeyNotFound`] is downgraded to `Ok(false)`;
    /// every other failure, including a permission refusal, propagates.
    pub fn is_key_found(&self, key: FourCc) -> SmcResult<bool> {
        match self.key_info(key) {
            Ok(_) => Ok(true),
            Err(SmcError::KeyNotFound { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Returns the number of registers the controller exposes, read from
    /// the well-known key-count register.
    pub fn key_count(&self) -> SmcResult<u32> {
        self.read::<BigEndian<u32>>(KEY_COUNT)
            .map(BigEndian::into_inner)
    }

    /// Enumerates every register key in table order.
    ///
    /// # Errors
    ///
    /// The first per-index failure aborts the whole enumeration with
    /// [`SmcError::IndexLookupFailed`]; no partial list is returned.
    pub fn keys(&self) -> SmcResult<Vec<FourCc>> {
        let count = self.key_count()?;
        let mut state = self.state.lock();
        Self::ensure_open(&mut state)?;
        let mut keys = Vec::with_capacity(count as usize);
        for index in 0..count {
            keys.push(protocol::key_at_index(state.chan.as_mut(), index)?);
        }
        Ok(keys)
    }

    /// Discards every cached descriptor.
    ///
    /// The next `key_info` per key re-queries the driver. Never touches
    /// the channel.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Closes the facade: releases the channel and clears the cache.
    ///
    /// Closing an already-closed facade is a no-op; any later operation
    /// fails with [`SmcError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns [`SmcError::DisconnectFailed`] if the driver rejects the
    /// release.
    pub fn close(&self) -> SmcResult<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        self.cache.clear();
        if state.open {
            state.open = false;
            state.chan.close().map_err(SmcError::DisconnectFailed)?;
        }
        debug!("SMC facade closed");
        Ok(())
    }
}

#[cfg(target_os = "macos")]
impl Default for Smc {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Smc {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.open && !state.closed {
            let _ = state.chan.close();
        }
    }
}
