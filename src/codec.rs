//! Binary encoding for moves, results, configs and statistics.
//!
//! Values are bincode-encoded. Streams carry one value per frame: a `u32`
//! little-endian payload length followed by the payload.

use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{MctsError, Result};

/// Largest payload accepted by [`read_frame`] and [`write_frame`].
pub const MAX_FRAME: usize = 16 * 1024 * 1024;

/// Encode a value to bytes.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serialize(value)?)
}

/// Decode a value from bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}

/// Write one length-prefixed frame.
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    let payload = encode(value)?;
    if payload.len() > MAX_FRAME {
        return Err(MctsError::FrameTooLarge {
            len: payload.len(),
            max: MAX_FRAME,
        });
    }

    writer.write_all(&(payload.len() as u32).to_le_bytes())?;
    writer.write_all(&payload)?;
    Ok(())
}

/// Read one length-prefixed frame.
///
/// The length is checked against [`MAX_FRAME`] before anything is
/// allocated.
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;

    let len = u32::from_le_bytes(header) as usize;
    if len > MAX_FRAME {
        return Err(MctsError::FrameTooLarge { len, max: MAX_FRAME });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    decode(&payload)
}
