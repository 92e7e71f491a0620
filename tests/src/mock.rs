//! Scripted status server for end-to-end probe tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mcstat_protocols::varint::{self, VarIntDecoder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};

/// How the mock answers once it has read the handshake and status request.
#[derive(Debug, Clone)]
pub enum Behaviour {
    Reply(String),
    /// Declares a long frame, sends a few bytes of it, then hangs up.
    Truncated,
    /// Accepts and reads but never answers.
    Silent,
    WrongPacketId,
}

/// Host and port a client announced in its handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    pub protocol_version: i32,
    pub host: String,
    pub port: u16,
    pub next_state: i32,
}

pub struct MockServer {
    pub addr: SocketAddr,
    handshakes: Arc<Mutex<Vec<Handshake>>>,
}

impl MockServer {
    pub async fn start(behaviour: Behaviour) -> anyhow::Result<Self> {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let handshakes: Arc<Mutex<Vec<Handshake>>> = Arc::new(Mutex::new(Vec::new()));

        let seen: Arc<Mutex<Vec<Handshake>>> = Arc::clone(&handshakes);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let behaviour: Behaviour = behaviour.clone();
                let seen: Arc<Mutex<Vec<Handshake>>> = Arc::clone(&seen);
                tokio::spawn(async move {
                    let _ = serve_one(stream, behaviour, seen).await;
                });
            }
        });

        Ok(Self { addr, handshakes })
    }

    /// Convenience for a well-behaved server.
    pub async fn replying(json: serde_json::Value) -> anyhow::Result<Self> {
        Self::start(Behaviour::Reply(json.to_string())).await
    }

    pub fn handshakes(&self) -> Vec<Handshake> {
        self.handshakes.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

async fn serve_one(
    mut stream: TcpStream,
    behaviour: Behaviour,
    seen: Arc<Mutex<Vec<Handshake>>>,
) -> anyhow::Result<()> {
    let handshake: Vec<u8> = read_frame(&mut stream).await?;
    if let Ok(mut seen) = seen.lock() {
        seen.push(parse_handshake(&handshake)?);
    }
    let request: Vec<u8> = read_frame(&mut stream).await?;
    anyhow::ensure!(request == [0x00], "unexpected status request {request:?}");

    match behaviour {
        Behaviour::Reply(json) => stream.write_all(&status_frame(0x00, &json)).await?,
        Behaviour::WrongPacketId => stream.write_all(&status_frame(0x05, "{}")).await?,
        Behaviour::Truncated => {
            let mut partial: Vec<u8> = varint::encode(100);
            partial.extend_from_slice(&[0x00, 0x10, b'{']);
            stream.write_all(&partial).await?;
        }
        Behaviour::Silent => tokio::time::sleep(Duration::from_secs(60)).await,
    }
    stream.flush().await?;
    Ok(())
}

async fn read_frame(stream: &mut TcpStream) -> anyhow::Result<Vec<u8>> {
    let mut decoder: VarIntDecoder = VarIntDecoder::default();
    let length: i32 = loop {
        if let Some(length) = decoder.push(stream.read_u8().await?)? {
            break length;
        }
    };
    let mut body: Vec<u8> = vec![0; usize::try_from(length)?];
    stream.read_exact(&mut body).await?;
    Ok(body)
}

fn parse_handshake(body: &[u8]) -> anyhow::Result<Handshake> {
    let (packet_id, mut pos) = varint::read(body)?;
    anyhow::ensure!(packet_id == 0, "handshake packet id {packet_id}");

    let (protocol_version, used) = varint::read(&body[pos..])?;
    pos += used;
    let (host_len, used) = varint::read(&body[pos..])?;
    pos += used;
    let host_end: usize = pos + usize::try_from(host_len)?;
    let host: String = String::from_utf8(body.get(pos..host_end).unwrap_or_default().to_vec())?;
    pos = host_end;

    let port_bytes: &[u8] = body.get(pos..pos + 2).unwrap_or_default();
    anyhow::ensure!(port_bytes.len() == 2, "handshake is missing the port");
    let port: u16 = u16::from_be_bytes([port_bytes[0], port_bytes[1]]);
    pos += 2;
    let (next_state, _) = varint::read(&body[pos..])?;

    Ok(Handshake {
        protocol_version,
        host,
        port,
        next_state,
    })
}

fn status_frame(packet_id: u8, json: &str) -> Vec<u8> {
    let mut body: Vec<u8> = vec![packet_id];
    varint::write(json.len() as i32, &mut body);
    body.extend_from_slice(json.as_bytes());

    let mut frame: Vec<u8> = varint::encode(body.len() as i32);
    frame.extend_from_slice(&body);
    frame
}

/// UDP nameserver that answers every SRV query with one fixed record, or
/// with NXDOMAIN when built without one.
pub struct MockNameserver {
    pub addr: SocketAddr,
}

impl MockNameserver {
    pub async fn start(record: Option<(u16, &str)>) -> anyhow::Result<Self> {
        Self::lossy(record, 0).await
    }

    /// Like [`MockNameserver::start`], but ignores the first `drop_first`
    /// queries as if they were lost in transit.
    pub async fn lossy(record: Option<(u16, &str)>, drop_first: usize) -> anyhow::Result<Self> {
        let socket: UdpSocket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = socket.local_addr()?;
        let record: Option<(u16, String)> = record.map(|(port, target)| (port, target.to_string()));

        tokio::spawn(async move {
            let mut buf: Vec<u8> = vec![0u8; 512];
            let mut dropped: usize = 0;
            while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
                if dropped < drop_first {
                    dropped += 1;
                    continue;
                }
                let reply: Vec<u8> = srv_reply(&buf[..n], record.as_ref());
                let _ = socket.send_to(&reply, peer).await;
            }
        });

        Ok(Self { addr })
    }
}

fn srv_reply(query: &[u8], record: Option<&(u16, String)>) -> Vec<u8> {
    let mut reply: Vec<u8> = query.to_vec();
    if reply.len() < 12 {
        return reply;
    }

    let Some((port, target)) = record else {
        reply[2..4].copy_from_slice(&[0x81, 0x83]);
        return reply;
    };

    reply[2..4].copy_from_slice(&[0x81, 0x80]);
    reply[6..8].copy_from_slice(&1u16.to_be_bytes());

    let mut rdata: Vec<u8> = Vec::new();
    rdata.extend_from_slice(&0u16.to_be_bytes()); // priority
    rdata.extend_from_slice(&5u16.to_be_bytes()); // weight
    rdata.extend_from_slice(&port.to_be_bytes());
    for label in target.split('.').filter(|label| !label.is_empty()) {
        rdata.push(label.len() as u8);
        rdata.extend_from_slice(label.as_bytes());
    }
    rdata.push(0);

    reply.extend_from_slice(&[0xc0, 0x0c, 0x00, 0x21, 0x00, 0x01]);
    reply.extend_from_slice(&60u32.to_be_bytes());
    reply.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    reply.extend_from_slice(&rdata);
    reply
}
