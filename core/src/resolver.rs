//! # Address Resolver
//!
//! Turns a raw address into the [`Target`] a probe connects to. Addresses
//! without an explicit port may be redirected by a `_minecraft._tcp` SRV
//! record; discovery failures never fail the probe and fall back to the
//! default port instead.
//!
//! Discovery only gets a slice of the probe budget, so a nameserver that
//! never answers still leaves time to connect to the fallback.

use std::net::SocketAddr;
use std::time::Duration;

use mcstat_common::config::Config;
use mcstat_common::error::ProbeError;
use mcstat_common::network::target::{self, ParsedAddress, Target};
use mcstat_protocols::dns::{self as dns_wire, SrvRecord};
use tokio::time::Instant;
use tracing::debug;

use crate::network::dns;

#[derive(Debug, Clone)]
pub struct AddressResolver {
    srv_lookup: bool,
    nameserver: Option<SocketAddr>,
    default_port: u16,
    srv_budget: Duration,
}

/// Share of the probe budget SRV discovery may spend.
const SRV_BUDGET_DIVISOR: u32 = 4;

impl AddressResolver {
    pub fn new(cfg: &Config) -> Self {
        Self {
            srv_lookup: cfg.srv_lookup,
            nameserver: cfg.nameserver,
            default_port: cfg.default_port,
            srv_budget: cfg.timeout / SRV_BUDGET_DIVISOR,
        }
    }

    /// Parses `raw` and, when it names a host without a port, consults SRV
    /// records. Discovery stops at a quarter of the budget or at `deadline`,
    /// whichever comes first.
    pub async fn resolve(&self, raw: &str, deadline: Instant) -> Result<Target, ProbeError> {
        let mut parsed: ParsedAddress = target::parse_address(raw)?;
        if !parsed.explicit_port {
            parsed.target.port = self.default_port;
        }
        if !self.wants_discovery(&parsed) {
            return Ok(parsed.target);
        }

        let fallback: Target = parsed.target;
        let srv_deadline: Instant = deadline.min(Instant::now() + self.srv_budget);
        let nameserver: SocketAddr = match self.nameserver {
            Some(addr) => addr,
            None => dns::system_nameserver().await,
        };
        let service: String = dns_wire::service_name(&fallback.host);

        match dns::lookup_srv(&service, nameserver, srv_deadline).await {
            Ok(records) => Ok(select_record(&records).unwrap_or(fallback)),
            Err(e) => {
                debug!("SRV lookup for {service} failed, using {fallback}: {e:#}");
                Ok(fallback)
            }
        }
    }

    fn wants_discovery(&self, parsed: &ParsedAddress) -> bool {
        self.srv_lookup && !parsed.explicit_port && !parsed.target.is_ip_literal()
    }
}

/// Records arrive sorted by priority; the first one with a target wins.
fn select_record(records: &[SrvRecord]) -> Option<Target> {
    records
        .iter()
        .find(|record| !record.target.is_empty())
        .map(|record| Target::new(record.target.clone(), record.port))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
