use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, bail, ensure};
use mcstat_protocols::dns::{self, SrvRecord};
use tokio::net::UdpSocket;
use tokio::time::{Instant, timeout_at};
use tracing::trace;

const DNS_PORT: u16 = 53;
const RESOLV_CONF: &str = "/etc/resolv.conf";
const MAX_DNS_PAYLOAD: usize = 1232;
/// The query is sent once more halfway through the window in case the first
/// datagram was lost.
const SRV_ATTEMPTS: u32 = 2;

/// Asks `nameserver` for the SRV records of `name`, giving up at `deadline`.
pub async fn lookup_srv(name: &str, nameserver: SocketAddr, deadline: Instant) -> anyhow::Result<Vec<SrvRecord>> {
    let id: u16 = rand::random();
    let query: Vec<u8> = dns::create_srv_packet(name, id)?;

    let bind_addr: SocketAddr = match nameserver {
        SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED), 0),
    };
    let socket: UdpSocket = UdpSocket::bind(bind_addr).await.context("binding dns socket")?;
    socket.connect(nameserver).await.context("connecting dns socket")?;

    let mut buf: Vec<u8> = vec![0u8; MAX_DNS_PAYLOAD];
    let slice: Duration = deadline.saturating_duration_since(Instant::now()) / SRV_ATTEMPTS;
    for attempt in 1..=SRV_ATTEMPTS {
        socket.send(&query).await.context("sending srv query")?;

        let give_up: Instant = if attempt == SRV_ATTEMPTS {
            deadline
        } else {
            deadline.min(Instant::now() + slice)
        };
        if let Some(records) = await_answer(&socket, &mut buf, id, give_up).await? {
            ensure!(!records.is_empty(), "no SRV record for {name}");
            return Ok(records);
        }
        trace!("no SRV answer for {name} yet (attempt {attempt})");
    }
    bail!("srv query for {name} timed out")
}

/// Waits for the reply carrying `id`. `None` when `until` passes first.
async fn await_answer(
    socket: &UdpSocket,
    buf: &mut [u8],
    id: u16,
    until: Instant,
) -> anyhow::Result<Option<Vec<SrvRecord>>> {
    loop {
        let n: usize = match timeout_at(until, socket.recv(buf)).await {
            Ok(received) => received.context("receiving srv answer")?,
            Err(_elapsed) => return Ok(None),
        };

        let (response_id, records) = dns::extract_srv_records(&buf[..n])?;
        // Stray datagrams with another id are skipped
        if response_id != id {
            continue;
        }
        return Ok(Some(records));
    }
}

/// Nameserver to use when none is configured: the first entry of
/// `/etc/resolv.conf`, or a public resolver when that cannot be read.
pub async fn system_nameserver() -> SocketAddr {
    match tokio::fs::read_to_string(RESOLV_CONF).await {
        Ok(contents) => parse_resolv_conf(&contents).unwrap_or_else(|_| fallback_nameserver()),
        Err(_) => fallback_nameserver(),
    }
}

fn fallback_nameserver() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(1, 1, 1, 1)), DNS_PORT)
}

fn parse_resolv_conf(contents: &str) -> anyhow::Result<SocketAddr> {
    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("nameserver") {
            continue;
        }
        // Scoped link-local entries like fe80::1%eth0 are skipped
        if let Some(Ok(ip)) = fields.next().map(str::parse::<IpAddr>) {
            return Ok(SocketAddr::new(ip, DNS_PORT));
        }
    }
    bail!("no usable nameserver entry")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
