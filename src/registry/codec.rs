/*!
 * Pidfile Codec
 *
 * On-disk layout:
 * - byte 0: format version (`PIDFILE_FORMAT_VERSION`)
 * - bytes 1..: bincode 1.x default encoding of `Vec<i32>`, i.e. a u64
 *   little-endian element count followed by each pid as i32 little-endian,
 *   in ascending order
 *
 * A zero-length file decodes to an empty set. Bytes after the encoded list
 * make the file malformed.
 */

use crate::core::limits::PIDFILE_FORMAT_VERSION;
use crate::core::types::{Pid, PidSet};
use bincode::Options;
use thiserror::Error;

/// Pidfile decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("unsupported format version: expected {expected}, got {actual}")]
    InvalidVersion { expected: u8, actual: u8 },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Encode a pid set into pidfile bytes
pub fn encode(pids: &PidSet) -> Result<Vec<u8>, String> {
    let ordered: Vec<Pid> = pids.iter().copied().collect();
    let payload = wire_options()
        .serialize(&ordered)
        .map_err(|e| e.to_string())?;

    let mut bytes = Vec::with_capacity(payload.len() + 1);
    bytes.push(PIDFILE_FORMAT_VERSION);
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode pidfile bytes into a pid set
pub fn decode(bytes: &[u8]) -> Result<PidSet, CodecError> {
    let Some((&version, payload)) = bytes.split_first() else {
        return Ok(PidSet::new());
    };

    if version != PIDFILE_FORMAT_VERSION {
        return Err(CodecError::InvalidVersion {
            expected: PIDFILE_FORMAT_VERSION,
            actual: version,
        });
    }

    let pids: Vec<Pid> = wire_options()
        .deserialize(payload)
        .map_err(|e| CodecError::Malformed(e.to_string()))?;
    Ok(pids.into_iter().collect())
}

/// Fixed-width little-endian integers, same layout as `bincode::serialize`
fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}
