use std::net::SocketAddr;
use std::time::Duration;

use crate::network::target::DEFAULT_PORT;

/// Budget applied to a single probe when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    /// Total time allowed for one probe.
    ///
    /// Covers SRV discovery, hostname resolution, connecting and every
    /// read/write of the exchange. Never mutated once a probe has started.
    pub timeout: Duration,
    /// Look up `_minecraft._tcp.<host>` when an address carries no port.
    pub srv_lookup: bool,
    /// Nameserver used for SRV queries. `None` reads the system resolver
    /// configuration.
    pub nameserver: Option<SocketAddr>,
    /// Port used when an address has none and SRV discovery yields nothing.
    pub default_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            srv_lookup: true,
            nameserver: None,
            default_port: DEFAULT_PORT,
        }
    }
}
