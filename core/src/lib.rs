//! Probe engine: bounded-time transport, address resolution with SRV
//! discovery, the status exchange and the batch orchestrator.

pub mod network;
pub mod probe;
pub mod query;
pub mod resolver;

pub use probe::{JavaProber, StatusProber, probe_all};
