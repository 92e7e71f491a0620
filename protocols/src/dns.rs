//! SRV record queries used to find where a host really serves the game.

use dns_parser::{Packet, RData, ResponseCode};
use pnet::packet::dns::{DnsClass, DnsQuery, DnsType, MutableDnsPacket, Opcode, Retcode};

use crate::error::ProtocolError;

pub const DNS_HDR_LEN: usize = 12;
const SRV_RECORD_TYPE: DnsType = DnsType(33);
const INTERNET_CLASS: DnsClass = DnsClass(1);

/// Service label prepended to a hostname for discovery.
pub const MINECRAFT_SERVICE: &str = "_minecraft._tcp";

/// A single SRV answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

pub fn service_name(host: &str) -> String {
    format!("{MINECRAFT_SERVICE}.{}", host.trim_end_matches('.'))
}

pub fn create_srv_packet(name: &str, id: u16) -> Result<Vec<u8>, ProtocolError> {
    let query: DnsQuery = create_srv_query(name)?;
    let q_fixed_len: usize = 4;
    let qlen: usize = query.qname.len() + q_fixed_len;
    let total: usize = DNS_HDR_LEN + qlen;
    let mut buffer: Vec<u8> = vec![0u8; total];

    {
        let mut dns: MutableDnsPacket = MutableDnsPacket::new(&mut buffer)
            .ok_or_else(|| ProtocolError::Dns("buffer too small for header".into()))?;
        dns.set_id(id);
        dns.set_is_response(0);
        dns.set_opcode(Opcode::StandardQuery);
        dns.set_is_authoriative(0);
        dns.set_is_truncated(0);
        dns.set_is_recursion_desirable(1);
        dns.set_is_recursion_available(0);
        dns.set_zero_reserved(0);
        dns.set_is_non_authenticated_data(0);
        dns.set_rcode(Retcode::NoError);
        dns.set_query_count(1);
        dns.set_response_count(0);
        dns.set_authority_rr_count(0);
        dns.set_additional_rr_count(0);
    }

    let mut cursor: usize = DNS_HDR_LEN;

    buffer[cursor..cursor + query.qname.len()].copy_from_slice(&query.qname);
    cursor += query.qname.len();

    let type_bytes: [u8; 2] = query.qtype.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&type_bytes);
    cursor += 2;

    let class_bytes: [u8; 2] = query.qclass.0.to_be_bytes();
    buffer[cursor..cursor + 2].copy_from_slice(&class_bytes);

    Ok(buffer)
}

/// Parses a reply to [`create_srv_packet`], returning its transaction id and
/// SRV answers ordered by priority (lowest first), then weight (highest first).
pub fn extract_srv_records(payload: &[u8]) -> Result<(u16, Vec<SrvRecord>), ProtocolError> {
    let packet: Packet = Packet::parse(payload).map_err(|e| ProtocolError::Dns(e.to_string()))?;
    if packet.header.response_code != ResponseCode::NoError {
        return Err(ProtocolError::Dns(format!(
            "server answered {:?}",
            packet.header.response_code
        )));
    }

    let mut records: Vec<SrvRecord> = packet
        .answers
        .iter()
        .filter_map(|answer| match &answer.data {
            RData::SRV(srv) => Some(SrvRecord {
                priority: srv.priority,
                weight: srv.weight,
                port: srv.port,
                target: srv.target.to_string().trim_end_matches('.').to_string(),
            }),
            _ => None,
        })
        .collect();

    records.sort_by(|a, b| a.priority.cmp(&b.priority).then(b.weight.cmp(&a.weight)));
    Ok((packet.header.id, records))
}

fn create_srv_query(name: &str) -> Result<DnsQuery, ProtocolError> {
    let qname: Vec<u8> = encode_dns_name(name)?;
    let query: DnsQuery = DnsQuery {
        qname,
        qtype: SRV_RECORD_TYPE,
        qclass: INTERNET_CLASS,
        payload: Vec::new(),
    };
    Ok(query)
}

fn encode_dns_name(name: &str) -> Result<Vec<u8>, ProtocolError> {
    let mut encoded: Vec<u8> = Vec::new();
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        if label.len() > 63 {
            return Err(ProtocolError::Dns(format!("label '{label}' exceeds 63 bytes")));
        }
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    Ok(encoded)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
