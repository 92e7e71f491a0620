//! Framing for the handshake and status packets.
//!
//! Every packet on the wire is `VarInt(length) ‖ VarInt(packet id) ‖ body`,
//! where `length` counts the id and the body.

use crate::error::ProtocolError;
use crate::varint;

/// Protocol version announced in the handshake. Servers answer status
/// queries regardless of the version sent.
pub const PROTOCOL_VERSION: i32 = 47;
/// Largest frame a server may legally send (3-byte VarInt limit).
pub const MAX_FRAME_LEN: i32 = 2_097_151;

const HANDSHAKE_ID: i32 = 0x00;
const STATUS_REQUEST_ID: i32 = 0x00;
const STATUS_RESPONSE_ID: i32 = 0x00;
const NEXT_STATE_STATUS: i32 = 1;

/// Handshake announcing a status query for `host:port`.
pub fn create_handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut body: Vec<u8> = Vec::with_capacity(host.len() + 16);
    varint::write(HANDSHAKE_ID, &mut body);
    varint::write(PROTOCOL_VERSION, &mut body);
    write_string(host, &mut body);
    body.extend_from_slice(&port.to_be_bytes());
    varint::write(NEXT_STATE_STATUS, &mut body);
    frame(body)
}

/// The empty status request that follows the handshake.
pub fn create_status_request_packet() -> Vec<u8> {
    frame(varint::encode(STATUS_REQUEST_ID))
}

/// Checks a frame length prefix before any of the frame is read.
pub fn validate_frame_length(length: i32) -> Result<usize, ProtocolError> {
    if length <= 0 || length > MAX_FRAME_LEN {
        return Err(ProtocolError::InvalidFrameLength(length));
    }
    Ok(length as usize)
}

/// Extracts the JSON document from the body of a status response frame
/// (everything after the length prefix).
pub fn parse_status_response(frame: &[u8]) -> Result<&str, ProtocolError> {
    let (packet_id, id_len) = varint::read(frame)?;
    if packet_id != STATUS_RESPONSE_ID {
        return Err(ProtocolError::UnexpectedPacketId(packet_id));
    }
    read_string(&frame[id_len..])
}

fn frame(body: Vec<u8>) -> Vec<u8> {
    let mut packet: Vec<u8> = Vec::with_capacity(body.len() + varint::MAX_VARINT_LEN);
    varint::write(body.len() as i32, &mut packet);
    packet.extend_from_slice(&body);
    packet
}

fn write_string(value: &str, buffer: &mut Vec<u8>) {
    varint::write(value.len() as i32, buffer);
    buffer.extend_from_slice(value.as_bytes());
}

fn read_string(bytes: &[u8]) -> Result<&str, ProtocolError> {
    let (length, prefix_len) = varint::read(bytes)?;
    let remaining: usize = bytes.len() - prefix_len;
    if length < 0 || length as usize > remaining {
        return Err(ProtocolError::StringLength { length, remaining });
    }
    let raw: &[u8] = &bytes[prefix_len..prefix_len + length as usize];
    std::str::from_utf8(raw).map_err(|_| ProtocolError::InvalidUtf8)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
