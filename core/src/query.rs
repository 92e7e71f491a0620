use mcstat_common::error::ProbeError;
use mcstat_common::network::target::Target;
use mcstat_common::status::Status;
use mcstat_protocols::{packet, status};
use tracing::trace;

use crate::network::tcp::Connection;

/// Runs the status exchange on an open connection.
///
/// Sends the handshake and status request, then reads exactly one response
/// frame. The host and port announced in the handshake are the ones the
/// probe resolved to, which virtual-hosting proxies rely on.
pub async fn handshake_and_query(conn: &mut Connection, target: &Target) -> Result<Status, ProbeError> {
    let mut request: Vec<u8> = packet::create_handshake_packet(&target.host, target.port);
    request.extend_from_slice(&packet::create_status_request_packet());
    conn.write_all(&request).await?;

    let declared: i32 = conn.read_varint().await?;
    let length: usize = packet::validate_frame_length(declared)?;
    trace!("{target} announced a {length} byte frame, {:?} left", conn.remaining());

    let mut frame: Vec<u8> = vec![0u8; length];
    conn.read_exact(&mut frame).await?;

    Ok(status::decode_status_frame(&frame)?)
}
