//! LEB128-style VarInt used for every length and id in the status protocol.
//!
//! Values are 32-bit two's complement, so negative numbers always take the
//! full five bytes.

use crate::error::ProtocolError;

pub const MAX_VARINT_LEN: usize = 5;

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;

pub fn write(value: i32, buffer: &mut Vec<u8>) {
    let mut remaining: u32 = value as u32;
    loop {
        let byte: u8 = (remaining as u8) & SEGMENT_BITS;
        remaining >>= 7;
        if remaining == 0 {
            buffer.push(byte);
            return;
        }
        buffer.push(byte | CONTINUE_BIT);
    }
}

pub fn encode(value: i32) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::with_capacity(MAX_VARINT_LEN);
    write(value, &mut buffer);
    buffer
}

/// Decodes a VarInt from the start of `bytes`, returning the value and how
/// many bytes it used.
pub fn read(bytes: &[u8]) -> Result<(i32, usize), ProtocolError> {
    let mut decoder: VarIntDecoder = VarIntDecoder::default();
    for (idx, byte) in bytes.iter().enumerate() {
        if let Some(value) = decoder.push(*byte)? {
            return Ok((value, idx + 1));
        }
    }
    Err(ProtocolError::VarIntIncomplete(bytes.len()))
}

/// Byte-at-a-time decoder for reading a VarInt straight off a stream.
#[derive(Debug, Default)]
pub struct VarIntDecoder {
    value: u32,
    position: usize,
}

impl VarIntDecoder {
    /// Feeds one byte. Returns the value once the last byte has been seen.
    pub fn push(&mut self, byte: u8) -> Result<Option<i32>, ProtocolError> {
        if self.position >= MAX_VARINT_LEN {
            return Err(ProtocolError::VarIntTooBig);
        }
        self.value |= u32::from(byte & SEGMENT_BITS) << (7 * self.position);
        self.position += 1;

        if byte & CONTINUE_BIT == 0 {
            return Ok(Some(self.value as i32));
        }
        if self.position == MAX_VARINT_LEN {
            return Err(ProtocolError::VarIntTooBig);
        }
        Ok(None)
    }

    pub fn bytes_read(&self) -> usize {
        self.position
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
