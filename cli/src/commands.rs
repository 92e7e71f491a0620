pub mod check;
pub mod serve;

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mcstat_common::config::Config;

#[derive(Parser)]
#[command(name = "mcstat")]
#[command(about = "Query Minecraft servers for their player counts and MOTD.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Time allowed for each probe, e.g. "10s" or "1500ms"
    #[arg(long, global = true, env = "MCSTAT_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Never look up _minecraft._tcp SRV records
    #[arg(long, global = true, env = "MCSTAT_NO_SRV")]
    pub no_srv: bool,

    /// Nameserver for SRV lookups instead of the system resolver
    #[arg(long, global = true, env = "MCSTAT_NAMESERVER")]
    pub nameserver: Option<SocketAddr>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve GET /check_servers over HTTP
    #[command(alias = "s")]
    Serve {
        #[arg(long, env = "MCSTAT_BIND", default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Probe a comma-separated list of servers once and print the results
    #[command(alias = "c")]
    Check {
        addresses: String,
        /// Print the same JSON body the HTTP endpoint returns
        #[arg(long)]
        json: bool,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            timeout: self.timeout,
            srv_lookup: !self.no_srv,
            nameserver: self.nameserver,
            ..Config::default()
        }
    }
}

/// Splits a request's address list the way the HTTP endpoint does: on every
/// comma, keeping empty and untrimmed tokens.
pub fn split_addresses(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
