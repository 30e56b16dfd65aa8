//! Fixed-layout record exchanged with the kernel driver.
//!
//! Every selector round-trips the same 80-byte [`KeyData`] record; commands
//! differ only in the selector byte and which fields are populated. The
//! field order and sizes are load-bearing: the driver copies the structure
//! verbatim across the kernel boundary.

use crate::fourcc::FourCc;

/// Length of the fixed data block carried by every register value.
pub const DATA_LEN: usize = 32;

/// The fixed transport unit for register values.
///
/// Values shorter than 32 bytes occupy the leading bytes; the remainder is
/// zero.
pub type SmcBytes = [u8; DATA_LEN];

/// Well-known register holding the controller's key count.
///
/// The count is stored big-endian contrary to the fixed-width default.
pub const KEY_COUNT: FourCc = FourCc::from_bytes(*b"#KEY");

/// Controller status byte: success.
pub const SMC_SUCCESS: u8 = 0;
/// Controller status byte: generic failure.
pub const SMC_ERROR: u8 = 1;
/// Controller status byte: no register with the requested key.
pub const SMC_KEY_NOT_FOUND: u8 = 132;
/// Controller status byte: declared and requested type disagree.
pub const SMC_DATA_TYPE_MISMATCH: u8 = 140;

/// Command selectors understood by the driver.
///
/// This core issues only the first four; the remaining selectors are part
/// of the driver ABI and are kept for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Read the value stored at a key.
    ReadKey = 5,
    /// Write a value to a key.
    WriteKey = 6,
    /// Look up the key code at a table index.
    GetKeyFromIndex = 8,
    /// Read a key's type descriptor.
    ReadKeyInfo = 9,
    /// Read the controller's power-limit record.
    ReadPowerLimit = 11,
    /// Read the controller's version record.
    ReadVersion = 12,
}

impl Command {
    /// Returns the selector byte placed in [`KeyData::data8`].
    #[must_use]
    pub const fn selector(self) -> u8 {
        self as u8
    }

    /// Maps a selector byte back to a command, if it names one.
    #[must_use]
    pub const fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            5 => Some(Self::ReadKey),
            6 => Some(Self::WriteKey),
            8 => Some(Self::GetKeyFromIndex),
            9 => Some(Self::ReadKeyInfo),
            11 => Some(Self::ReadPowerLimit),
            12 => Some(Self::ReadVersion),
            _ => None,
        }
    }
}

/// Controller firmware version sub-record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct KeyVers {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
    /// Build number.
    pub build: u8,
    /// Reserved, always zero.
    pub reserved: u8,
    /// Release number.
    pub release: u16,
}

/// Power-limit sub-record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct PLimitData {
    /// Record version.
    pub version: u16,
    /// Record length.
    pub length: u16,
    /// CPU power limit.
    pub cpu_plimit: u32,
    /// GPU power limit.
    pub gpu_plimit: u32,
    /// Memory power limit.
    pub mem_plimit: u32,
}

/// A register's type descriptor.
///
/// Retrieved once per key per cache lifetime; the controller does not
/// change a key's type while the process runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct KeyInfo {
    /// Number of meaningful bytes in the register's value, at most 32.
    pub data_size: u32,
    /// The register's type tag.
    pub data_type: FourCc,
    /// Attribute byte, carried verbatim from the controller.
    pub data_attributes: u8,
}

/// The record round-tripped with the kernel driver for every selector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct KeyData {
    /// Register key code.
    pub key: FourCc,
    /// Version sub-record.
    pub vers: KeyVers,
    /// Power-limit sub-record.
    pub plimit: PLimitData,
    /// Key-info sub-record.
    pub key_info: KeyInfo,
    /// Controller status byte for the completed command.
    pub result: u8,
    /// Status byte.
    pub status: u8,
    /// Command selector.
    pub data8: u8,
    /// Command context word (the index for [`Command::GetKeyFromIndex`]).
    pub data32: u32,
    /// The 32-byte data block.
    pub bytes: SmcBytes,
}
