//! # Probe Target Model
//!
//! Turns a raw address token into the host and port a probe connects to.
//!
//! Accepted forms:
//! * A bare host (`play.example.com`, `10.0.0.5`, `::1`): default port.
//! * Host and port (`play.example.com:25566`, `10.0.0.5:25566`).
//! * Bracketed IPv6, with or without port (`[::1]`, `[::1]:25566`).

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use crate::error::ProbeError;

/// Port a Java edition server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 25565;

/// A resolved host/port pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

/// A parsed address together with whether its port was spelled out.
///
/// Only addresses without an explicit port are candidates for SRV discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub target: Target,
    pub explicit_port: bool,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Whether the host is an IP literal, which makes DNS lookups pointless.
    pub fn is_ip_literal(&self) -> bool {
        self.host.parse::<IpAddr>().is_ok()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.parse::<Ipv6Addr>().is_ok() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parses `raw` into a [`Target`], applying [`DEFAULT_PORT`] when none is given.
pub fn resolve(raw: &str) -> Result<Target, ProbeError> {
    parse_address(raw).map(|parsed| parsed.target)
}

/// Parses `raw` and reports whether the port came from the input.
pub fn parse_address(raw: &str) -> Result<ParsedAddress, ProbeError> {
    let trimmed: &str = raw.trim();
    if trimmed.is_empty() {
        return Err(ProbeError::InvalidAddress("address is empty".into()));
    }

    if let Some(parsed) = parse_bracketed(trimmed)? {
        return Ok(parsed);
    }

    if trimmed.parse::<Ipv6Addr>().is_ok() {
        return Ok(implicit(trimmed));
    }

    let parsed: ParsedAddress = match trimmed.rsplit_once(':') {
        Some((host, port_str)) => match parse_port(port_str) {
            Some(port) => ParsedAddress {
                target: Target::new(host, port),
                explicit_port: true,
            },
            None => implicit(trimmed),
        },
        None => implicit(trimmed),
    };

    if parsed.target.host.is_empty() {
        return Err(ProbeError::InvalidAddress(format!("no host in '{raw}'")));
    }
    Ok(parsed)
}

/// Handles `[v6]` and `[v6]:port`.
fn parse_bracketed(s: &str) -> Result<Option<ParsedAddress>, ProbeError> {
    let Some(rest) = s.strip_prefix('[') else {
        return Ok(None);
    };
    let Some((host, tail)) = rest.split_once(']') else {
        return Err(ProbeError::InvalidAddress(format!("unterminated '[' in '{s}'")));
    };
    if host.is_empty() {
        return Err(ProbeError::InvalidAddress(format!("no host in '{s}'")));
    }

    if tail.is_empty() {
        return Ok(Some(implicit(host)));
    }

    let port: u16 = tail
        .strip_prefix(':')
        .and_then(parse_port)
        .ok_or_else(|| ProbeError::InvalidAddress(format!("invalid port in '{s}'")))?;

    Ok(Some(ParsedAddress {
        target: Target::new(host, port),
        explicit_port: true,
    }))
}

/// Only plain decimal digits count; `+25565` or `25565 ` are not ports.
fn parse_port(s: &str) -> Option<u16> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u16>().ok()
}

fn implicit(host: &str) -> ParsedAddress {
    ParsedAddress {
        target: Target::new(host, DEFAULT_PORT),
        explicit_port: false,
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
