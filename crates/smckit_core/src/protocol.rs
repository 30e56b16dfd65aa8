//! Request construction and reply judging for driver transactions.
//!
//! Every operation round-trips one fixed-layout record through a
//! [`DriverChannel`]. An operation succeeds only when both the transport
//! status and the controller status byte report success; a transport
//! permission failure takes priority over any controller code.

use crate::error::{SmcError, SmcResult};
use smckit_channel::{
    ChannelError, Command, DriverChannel, FourCc, KeyData, KeyInfo, SmcBytes, DATA_LEN,
    KERN_SUCCESS, SMC_DATA_TYPE_MISMATCH, SMC_KEY_NOT_FOUND, SMC_SUCCESS,
};
use tracing::trace;

fn transact(chan: &mut dyn DriverChannel, key: FourCc, input: &KeyData) -> SmcResult<KeyData> {
    let reply = match chan.call(input) {
        Ok(reply) => reply,
        Err(ChannelError::NotPrivileged) => return Err(SmcError::NotPrivileged),
        Err(err) => {
            return Err(SmcError::Unknown {
                key,
                kern: err.kern_return(),
                smc: 0,
            })
        }
    };
    trace!(%key, selector = input.data8, result = reply.result, "driver call");
    match reply.result {
        SMC_SUCCESS => Ok(reply),
        SMC_KEY_NOT_FOUND => Err(SmcError::KeyNotFound { key }),
        SMC_DATA_TYPE_MISMATCH => Err(SmcError::DataTypeMismatch { key }),
        smc => Err(SmcError::Unknown {
            key,
            kern: KERN_SUCCESS,
            smc,
        }),
    }
}

/// Queries the controller for a key's type descriptor.
pub(crate) fn read_key_info(chan: &mut dyn DriverChannel, key: FourCc) -> SmcResult<KeyInfo> {
    let input = KeyData {
        key,
        data8: Command::ReadKeyInfo.selector(),
        ..KeyData::default()
    };
    Ok(transact(chan, key, &input)?.key_info)
}

/// Reads a register's data block, sized per its descriptor.
pub(crate) fn read_key(
    chan: &mut dyn DriverChannel,
    key: FourCc,
    info: KeyInfo,
) -> SmcResult<SmcBytes> {
    let mut input = KeyData {
        key,
        data8: Command::ReadKey.selector(),
        ..KeyData::default()
    };
    input.key_info.data_size = info.data_size;
    Ok(transact(chan, key, &input)?.bytes)
}

/// Writes a register's data block, sized per its descriptor.
pub(crate) fn write_key(
    chan: &mut dyn DriverChannel,
    key: FourCc,
    info: KeyInfo,
    bytes: SmcBytes,
) -> SmcResult<()> {
    let mut input = KeyData {
        key,
        bytes,
        data8: Command::WriteKey.selector(),
        ..KeyData::default()
    };
    input.key_info.data_size = info.data_size;
    transact(chan, key, &input)?;
    Ok(())
}

/// Resolves the key stored at a table index.
///
/// Failures carry the index rather than a key code; enumeration callers
/// abort on the first one.
pub(crate) fn key_at_index(chan: &mut dyn DriverChannel, index: u32) -> SmcResult<FourCc> {
    let input = KeyData {
        data8: Command::GetKeyFromIndex.selector(),
        data32: index,
        ..KeyData::default()
    };
    let reply = match chan.call(&input) {
        Ok(reply) => reply,
        Err(ChannelError::NotPrivileged) => return Err(SmcError::NotPrivileged),
        Err(err) => {
            return Err(SmcError::IndexLookupFailed {
                index,
                kern: err.kern_return(),
                smc: 0,
            })
        }
    };
    if reply.result == SMC_SUCCESS {
        Ok(reply.key)
    } else {
        Err(SmcError::IndexLookupFailed {
            index,
            kern: KERN_SUCCESS,
            smc: reply.result,
        })
    }
}

/// Decodes a register payload as an ASCII string, trimmed at the first
/// zero byte.
pub(crate) fn decode_string(key: FourCc, info: KeyInfo, bytes: &SmcBytes) -> SmcResult<String> {
    let len = (info.data_size as usize).min(DATA_LEN);
    let payload = &bytes[..len];
    let end = payload.iter().position(|&b| b == 0).unwrap_or(len);
    let text = &payload[..end];
    if !text.is_ascii() {
        return Err(SmcError::InvalidStringData { key });
    }
    String::from_utf8(text.to_vec()).map_err(|_| SmcError::InvalidStringData { key })
}

/// Encodes an ASCII string into a zero-padded register payload.
pub(crate) fn encode_string(key: FourCc, info: KeyInfo, text: &str) -> SmcResult<SmcBytes> {
    if !text.is_ascii() {
        return Err(SmcError::InvalidStringData { key });
    }
    let capacity = (info.data_size as usize).min(DATA_LEN);
    if text.len() > capacity {
        return Err(SmcError::InvalidDataSize {
            key,
            expected: info.data_size,
            actual: text.len() as u32,
        });
    }
    let mut out = [0u8; DATA_LEN];
    out[..text.len()].copy_from_slice(text.as_bytes());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smckit_channel::SimChannel;

    fn tc0p() -> FourCc {
        FourCc::from_bytes(*b"TC0P")
    }

    fn ui16() -> FourCc {
        FourCc::from_bytes(*b"ui16")
    }

    fn open_sim(entries: &[(FourCc, FourCc, &[u8])]) -> SimChannel {
        let mut sim = SimChannel::with_keys(entries);
        sim.open().unwrap();
        sim
    }

    #[test]
    fn read_key_info_reports_descriptor() {
        let mut sim = open_sim(&[(tc0p(), ui16(), &[0x2a, 0x00])]);
        let info = read_key_info(&mut sim, tc0p()).unwrap();
        assert_eq!(info.data_size, 2);
        assert_eq!(info.data_type, ui16());
    }

    #[test]
    fn missing_key_maps_to_key_not_found() {
        let mut sim = open_sim(&[]);
        let err = read_key_info(&mut sim, tc0p()).unwrap_err();
        assert_eq!(err, SmcError::KeyNotFound { key: tc0p() });
    }

    #[test]
    fn transport_refusal_maps_to_not_privileged() {
        let mut sim = open_sim(&[(tc0p(), ui16(), &[0x2a, 0x00])]);
        sim.refuse(Command::ReadKeyInfo);
        let err = read_key_info(&mut sim, tc0p()).unwrap_err();
        assert_eq!(err, SmcError::NotPrivileged);
    }

    #[test]
    fn read_key_returns_stored_bytes() {
        let mut sim = open_sim(&[(tc0p(), ui16(), &[0x2a, 0x00])]);
        let info = read_key_info(&mut sim, tc0p()).unwrap();
        let bytes = read_key(&mut sim, tc0p(), info).unwrap();
        assert_eq!(&bytes[..2], &[0x2a, 0x00]);
    }

    #[test]
    fn write_key_replaces_stored_bytes() {
        let mut sim = open_sim(&[(tc0p(), ui16(), &[0x00, 0x00])]);
        let info = read_key_info(&mut sim, tc0p()).unwrap();
        let mut bytes = [0u8; DATA_LEN];
        bytes[..2].copy_from_slice(&[0x10, 0x27]);
        write_key(&mut sim, tc0p(), info, bytes).unwrap();
        assert_eq!(sim.stored(tc0p()).unwrap()[..2], [0x10, 0x27]);
    }

    #[test]
    fn index_failure_identifies_the_index() {
        let mut sim = open_sim(&[(tc0p(), ui16(), &[0, 0])]);
        sim.fail_index(0);
        let err = key_at_index(&mut sim, 0).unwrap_err();
        assert_eq!(
            err,
            SmcError::IndexLookupFailed {
                index: 0,
                kern: KERN_SUCCESS,
                smc: 1,
            }
        );
    }

    #[test]
    fn string_decode_trims_at_first_zero() {
        let key = FourCc::from_bytes(*b"RVBF");
        let info = KeyInfo {
            data_size: 16,
            data_type: FourCc::from_bytes(*b"ch8*"),
            data_attributes: 0,
        };
        let mut bytes = [0u8; DATA_LEN];
        bytes[..5].copy_from_slice(b"j614s");
        assert_eq!(decode_string(key, info, &bytes).unwrap(), "j614s");
    }

    #[test]
    fn string_decode_rejects_non_ascii() {
        let key = FourCc::from_bytes(*b"RVBF");
        let info = KeyInfo {
            data_size: 4,
            data_type: FourCc::from_bytes(*b"ch8*"),
            data_attributes: 0,
        };
        let mut bytes = [0u8; DATA_LEN];
        bytes[..2].copy_from_slice(&[0xC3, 0xA9]);
        assert_eq!(
            decode_string(key, info, &bytes).unwrap_err(),
            SmcError::InvalidStringData { key }
        );
    }

    #[test]
    fn string_encode_zero_pads_to_capacity() {
        let key = FourCc::from_bytes(*b"RVBF");
        let info = KeyInfo {
            data_size: 16,
            data_type: FourCc::from_bytes(*b"ch8*"),
            data_attributes: 0,
        };
        let out = encode_string(key, info, "j614s").unwrap();
        assert_eq!(&out[..5], b"j614s");
        assert!(out[5..].iter().all(|&b| b == 0));
    }

    #[test]
    fn string_encode_rejects_overflow() {
        let key = FourCc::from_bytes(*b"RVBF");
        let info = KeyInfo {
            data_size: 4,
            data_type: FourCc::from_bytes(*b"ch8*"),
            data_attributes: 0,
        };
        let err = encode_string(key, info, "toolong").unwrap_err();
        assert_eq!(
            err,
            SmcError::InvalidDataSize {
                key,
                expected: 4,
                actual: 7,
            }
        );
    }
}
