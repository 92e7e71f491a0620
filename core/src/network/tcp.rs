use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use mcstat_common::error::ProbeError;
use mcstat_common::network::target::Target;
use mcstat_protocols::ProtocolError;
use mcstat_protocols::varint::VarIntDecoder;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{self, TcpStream};
use tokio::time::{Instant, timeout_at};
use tracing::debug;

/// A TCP stream whose every operation races the same deadline.
///
/// The deadline is fixed when the probe starts, so time spent resolving and
/// connecting is no longer available to reads and writes.
pub struct Connection {
    stream: TcpStream,
    deadline: Instant,
    budget: Duration,
}

impl Connection {
    /// Resolves and connects to `target` before `deadline`.
    pub async fn open(target: &Target, deadline: Instant, budget: Duration) -> Result<Self, ProbeError> {
        let addrs: Vec<SocketAddr> = timeout_at(deadline, net::lookup_host((target.host.as_str(), target.port)))
            .await
            .map_err(|_| ProbeError::timeout("resolving host", budget))?
            .map_err(|e| ProbeError::Connection(format!("cannot resolve {}: {e}", target.host)))?
            .collect();

        if addrs.is_empty() {
            return Err(ProbeError::Connection(format!("{} has no addresses", target.host)));
        }

        let mut last_err: Option<std::io::Error> = None;
        for addr in addrs {
            match timeout_at(deadline, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    debug!("connected to {addr} for {target}");
                    return Ok(Self {
                        stream,
                        deadline,
                        budget,
                    });
                }
                Ok(Err(e)) => last_err = Some(e),
                Err(_elapsed) => return Err(ProbeError::timeout("connecting", budget)),
            }
        }

        let reason: String = last_err.map(|e| e.to_string()).unwrap_or_default();
        Err(ProbeError::Connection(format!("cannot connect to {target}: {reason}")))
    }

    pub async fn write_all(&mut self, bytes: &[u8]) -> Result<(), ProbeError> {
        timeout_at(self.deadline, self.stream.write_all(bytes))
            .await
            .map_err(|_| ProbeError::timeout("writing request", self.budget))?
            .map_err(|e| ProbeError::Connection(format!("write failed: {e}")))
    }

    /// Fills `buf` completely, looping over short reads.
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ProbeError> {
        let mut filled: usize = 0;
        while filled < buf.len() {
            let n: usize = timeout_at(self.deadline, self.stream.read(&mut buf[filled..]))
                .await
                .map_err(|_| ProbeError::timeout("reading frame", self.budget))?
                .map_err(io_to_probe_error)?;
            if n == 0 {
                return Err(ProtocolError::Truncated {
                    declared: buf.len(),
                    received: filled,
                }
                .into());
            }
            filled += n;
        }
        Ok(())
    }

    pub async fn read_varint(&mut self) -> Result<i32, ProbeError> {
        let mut decoder: VarIntDecoder = VarIntDecoder::default();
        loop {
            let byte: u8 = timeout_at(self.deadline, self.stream.read_u8())
                .await
                .map_err(|_| ProbeError::timeout("reading frame length", self.budget))?
                .map_err(|e| match e.kind() {
                    ErrorKind::UnexpectedEof if decoder.bytes_read() == 0 => {
                        ProbeError::Protocol("connection closed before any response".into())
                    }
                    ErrorKind::UnexpectedEof => {
                        ProtocolError::VarIntIncomplete(decoder.bytes_read()).into()
                    }
                    _ => io_to_probe_error(e),
                })?;
            if let Some(value) = decoder.push(byte)? {
                return Ok(value);
            }
        }
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

fn io_to_probe_error(e: std::io::Error) -> ProbeError {
    ProbeError::Connection(format!("read failed: {e}"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
