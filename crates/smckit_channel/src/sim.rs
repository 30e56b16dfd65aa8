//! Simulated controller channel for testing.

use crate::channel::DriverChannel;
use crate::error::{ChannelError, ChannelResult};
use crate::fourcc::FourCc;
use crate::wire::{
    Command, KeyData, KeyInfo, SmcBytes, DATA_LEN, KEY_COUNT, SMC_DATA_TYPE_MISMATCH, SMC_ERROR,
    SMC_KEY_NOT_FOUND, SMC_SUCCESS,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Per-command call counters maintained by [`SimChannel`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    /// Completed read-key-info calls.
    pub key_info: u32,
    /// Completed read-key calls.
    pub read_key: u32,
    /// Completed write-key calls.
    pub write_key: u32,
    /// Completed get-key-from-index calls.
    pub key_from_index: u32,
}

/// A cloneable handle onto a simulator's call counters.
///
/// The handle stays valid after the simulator is boxed behind a
/// [`DriverChannel`], so tests can assert how many driver calls a higher
/// layer issued.
#[derive(Debug, Default, Clone)]
pub struct CounterHandle(Arc<Mutex<CallCounts>>);

impl CounterHandle {
    /// Returns a copy of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> CallCounts {
        *self.0.lock()
    }

    fn bump(&self, bump: impl FnOnce(&mut CallCounts)) {
        bump(&mut self.0.lock());
    }
}

/// An in-memory simulated controller.
///
/// The simulator holds an ordered key table and interprets the same
/// selectors as the real driver, which makes it suitable for:
/// - Unit tests
/// - Integration tests
/// - Exercising error paths that are hard to reach on real hardware
///
/// The well-known [`KEY_COUNT`] register is always present and reports the
/// table length as a big-endian 32-bit count; it does not occupy a table
/// index.
///
/// # Example
///
/// ```rust
/// use smckit_channel::{FourCc, SimChannel};
///
/// let chan = SimChannel::with_keys(&[
///     (FourCc::from_bytes(*b"TC0P"), FourCc::from_bytes(*b"ui16"), &[0x2a, 0x00]),
/// ]);
/// assert_eq!(chan.stored(FourCc::from_bytes(*b"TC0P")).unwrap()[0], 0x2a);
/// ```
#[derive(Debug, Default)]
pub struct SimChannel {
    keys: Vec<(FourCc, KeyInfo, SmcBytes)>,
    open: bool,
    fail_open: bool,
    refused: Vec<Command>,
    failed_indices: Vec<u32>,
    counts: CounterHandle,
}

impl SimChannel {
    /// Creates a simulator with an empty key table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator seeded with `(key, type tag, value)` entries.
    ///
    /// Each entry's declared size is the value's length.
    ///
    /// # Panics
    ///
    /// Panics if a value exceeds the 32-byte data block.
    #[must_use]
    pub fn with_keys(entries: &[(FourCc, FourCc, &[u8])]) -> Self {
        let mut sim = Self::new();
        for (key, data_type, value) in entries {
            sim.add_key(*key, *data_type, value);
        }
        sim
    }

    /// Adds a register to the end of the key table.
    ///
    /// # Panics
    ///
    /// Panics if `value` exceeds the 32-byte data block.
    pub fn add_key(&mut self, key: FourCc, data_type: FourCc, value: &[u8]) {
        assert!(value.len() <= DATA_LEN, "register value exceeds {DATA_LEN} bytes");
        let info = KeyInfo {
            data_size: value.len() as u32,
            data_type,
            data_attributes: 0,
        };
        let mut bytes: SmcBytes = [0; DATA_LEN];
        bytes[..value.len()].copy_from_slice(value);
        self.keys.push((key, info, bytes));
    }

    /// Makes subsequent `open` calls fail as if the service were absent.
    pub fn fail_open(&mut self) {
        self.fail_open = true;
    }

    /// Makes subsequent calls with `command` fail with
    /// [`ChannelError::NotPrivileged`].
    pub fn refuse(&mut self, command: Command) {
        self.refused.push(command);
    }

    /// Makes get-key-from-index fail with a controller error at `index`.
    pub fn fail_index(&mut self, index: u32) {
        self.failed_indices.push(index);
    }

    /// Returns the stored data block for `key`, if present in the table.
    #[must_use]
    pub fn stored(&self, key: FourCc) -> Option<SmcBytes> {
        self.keys
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, _, bytes)| *bytes)
    }

    /// Returns a copy of the per-command call counters.
    #[must_use]
    pub fn counts(&self) -> CallCounts {
        self.counts.snapshot()
    }

    /// Returns a cloneable handle onto the call counters.
    #[must_use]
    pub fn counters(&self) -> CounterHandle {
        self.counts.clone()
    }

    fn entry(&self, key: FourCc) -> Option<(KeyInfo, SmcBytes)> {
        self.keys
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, info, bytes)| (*info, *bytes))
    }

    fn key_count_info() -> KeyInfo {
        KeyInfo {
            data_size: 4,
            data_type: FourCc::from_bytes(*b"ui32"),
            data_attributes: 0,
        }
    }
}

impl DriverChannel for SimChannel {
    fn open(&mut self) -> ChannelResult<()> {
        if self.fail_open {
            return Err(ChannelError::ServiceNotFound);
        }
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> ChannelResult<()> {
        self.open = false;
        Ok(())
    }

    fn call(&mut self, input: &KeyData) -> ChannelResult<KeyData> {
        if !self.open {
            return Err(ChannelError::Closed);
        }
        let command = Command::from_selector(input.data8);
        if let Some(command) = command {
            if self.refused.contains(&command) {
                return Err(ChannelError::NotPrivileged);
            }
        }

        let mut output = KeyData {
            key: input.key,
            ..KeyData::default()
        };
        match command {
            Some(Command::ReadKeyInfo) => {
                self.counts.bump(|c| c.key_info += 1);
                if input.key == KEY_COUNT {
                    output.key_info = Self::key_count_info();
                    output.result = SMC_SUCCESS;
                } else if let Some((info, _)) = self.entry(input.key) {
                    output.key_info = info;
                    output.result = SMC_SUCCESS;
                } else {
                    output.result = SMC_KEY_NOT_FOUND;
                }
            }
            Some(Command::ReadKey) => {
                self.counts.bump(|c| c.read_key += 1);
                if input.key == KEY_COUNT {
                    let count = self.keys.len() as u32;
                    output.bytes[..4].copy_from_slice(&count.to_be_bytes());
                    output.result = SMC_SUCCESS;
                } else if let Some((_, bytes)) = self.entry(input.key) {
                    output.bytes = bytes;
                    output.result = SMC_SUCCESS;
                } else {
                    output.result = SMC_KEY_NOT_FOUND;
                }
            }
            Some(Command::WriteKey) => {
                self.counts.bump(|c| c.write_key += 1);
                match self.keys.iter_mut().find(|(k, _, _)| *k == input.key) {
                    Some((_, info, bytes)) if info.data_size == input.key_info.data_size => {
                        *bytes = input.bytes;
                        output.result = SMC_SUCCESS;
                    }
                    Some(_) => output.result = SMC_DATA_TYPE_MISMATCH,
                    None => output.result = SMC_KEY_NOT_FOUND,
                }
            }
            Some(Command::GetKeyFromIndex) => {
                self.counts.bump(|c| c.key_from_index += 1);
                let index = input.data32;
                if self.failed_indices.contains(&index) {
                    output.result = SMC_ERROR;
                } else if let Some((key, _, _)) = self.keys.get(index as usize) {
                    output.key = *key;
                    output.result = SMC_SUCCESS;
                } else {
                    output.result = SMC_KEY_NOT_FOUND;
                }
            }
            _ => output.result = SMC_ERROR,
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_info(sim: &mut SimChannel, key: FourCc) -> KeyData {
        let mut input = KeyData::default();
        input.key = key;
        input.data8 = Command::ReadKeyInfo.selector();
        sim.call(&input).unwrap()
    }

    #[test]
    fn call_before_open_fails() {
        let mut sim = SimChannel::new();
        let input = KeyData::default();
        assert_eq!(sim.call(&input), Err(ChannelError::Closed));
    }

    #[test]
    fn open_failure_injection() {
        let mut sim = SimChannel::new();
        sim.fail_open();
        assert_eq!(sim.open(), Err(ChannelError::ServiceNotFound));
    }

    #[test]
    fn key_info_reports_declared_size_and_type() {
        let key = FourCc::from_bytes(*b"TC0P");
        let mut sim = SimChannel::with_keys(&[(key, FourCc::from_bytes(*b"ui16"), &[0, 0])]);
        sim.open().unwrap();

        let reply = read_info(&mut sim, key);
        assert_eq!(reply.result, SMC_SUCCESS);
        assert_eq!(reply.key_info.data_size, 2);
        assert_eq!(reply.key_info.data_type, FourCc::from_bytes(*b"ui16"));
    }

    #[test]
    fn key_info_for_missing_key() {
        let mut sim = SimChannel::new();
        sim.open().unwrap();
        let reply = read_info(&mut sim, FourCc::from_bytes(*b"ZZZZ"));
        assert_eq!(reply.result, SMC_KEY_NOT_FOUND);
    }

    #[test]
    fn key_count_register_is_synthesized() {
        let mut sim = SimChannel::with_keys(&[
            (FourCc::from_bytes(*b"TC0P"), FourCc::from_bytes(*b"ui16"), &[0, 0]),
            (FourCc::from_bytes(*b"TG0P"), FourCc::from_bytes(*b"ui16"), &[0, 0]),
        ]);
        sim.open().unwrap();

        let mut input = KeyData::default();
        input.key = KEY_COUNT;
        input.data8 = Command::ReadKey.selector();
        let reply = sim.call(&input).unwrap();
        assert_eq!(reply.result, SMC_SUCCESS);
        assert_eq!(&reply.bytes[..4], &[0, 0, 0, 2]);
    }

    #[test]
    fn write_replaces_stored_bytes() {
        let key = FourCc::from_bytes(*b"F0Tg");
        let mut sim = SimChannel::with_keys(&[(key, FourCc::from_bytes(*b"ui16"), &[0, 0])]);
        sim.open().unwrap();

        let mut input = KeyData::default();
        input.key = key;
        input.data8 = Command::WriteKey.selector();
        input.key_info.data_size = 2;
        input.bytes[..2].copy_from_slice(&[0x10, 0x27]);
        let reply = sim.call(&input).unwrap();
        assert_eq!(reply.result, SMC_SUCCESS);
        assert_eq!(sim.stored(key).unwrap()[..2], [0x10, 0x27]);
    }

    #[test]
    fn write_with_wrong_size_fails() {
        let key = FourCc::from_bytes(*b"F0Tg");
        let mut sim = SimChannel::with_keys(&[(key, FourCc::from_bytes(*b"ui16"), &[0, 0])]);
        sim.open().unwrap();

        let mut input = KeyData::default();
        input.key = key;
        input.data8 = Command::WriteKey.selector();
        input.key_info.data_size = 4;
        let reply = sim.call(&input).unwrap();
        assert_eq!(reply.result, SMC_DATA_TYPE_MISMATCH);
    }

    #[test]
    fn key_from_index_walks_table_order() {
        let mut sim = SimChannel::with_keys(&[
            (FourCc::from_bytes(*b"TC0P"), FourCc::from_bytes(*b"ui16"), &[0, 0]),
            (FourCc::from_bytes(*b"TG0P"), FourCc::from_bytes(*b"ui16"), &[0, 0]),
        ]);
        sim.open().unwrap();

        let mut input = KeyData::default();
        input.data8 = Command::GetKeyFromIndex.selector();
        input.data32 = 1;
        let reply = sim.call(&input).unwrap();
        assert_eq!(reply.result, SMC_SUCCESS);
        assert_eq!(reply.key, FourCc::from_bytes(*b"TG0P"));

        input.data32 = 2;
        let reply = sim.call(&input).unwrap();
        assert_eq!(reply.result, SMC_KEY_NOT_FOUND);
    }

    #[test]
    fn refused_command_is_not_privileged() {
        let key = FourCc::from_bytes(*b"TC0P");
        let mut sim = SimChannel::with_keys(&[(key, FourCc::from_bytes(*b"ui16"), &[0, 0])]);
        sim.open().unwrap();
        sim.refuse(Command::WriteKey);

        let mut input = KeyData::default();
        input.key = key;
        input.data8 = Command::WriteKey.selector();
        assert_eq!(sim.call(&input), Err(ChannelError::NotPrivileged));

        // Reads are unaffected.
        let reply = read_info(&mut sim, key);
        assert_eq!(reply.result, SMC_SUCCESS);
    }

    #[test]
    fn counters_track_dispatched_commands() {
        let key = FourCc::from_bytes(*b"TC0P");
        let mut sim = SimChannel::with_keys(&[(key, FourCc::from_bytes(*b"ui16"), &[0, 0])]);
        sim.open().unwrap();

        read_info(&mut sim, key);
        read_info(&mut sim, key);
        assert_eq!(sim.counts().key_info, 2);
        assert_eq!(sim.counts().read_key, 0);
    }
}
