//! # mcstat common types
//!
//! Shared models used by every layer of the prober:
//!
//! * [`network::target`]: raw address parsing into a [`network::target::Target`].
//! * [`status`]: the per-target outcome of a probe.
//! * [`batch`]: the ordered, de-duplicated collection of outcomes.
//! * [`error`]: the failure taxonomy recovered at the per-target boundary.
//! * [`config`]: read-only settings threaded into every probe.

pub mod batch;
pub mod config;
pub mod error;
pub mod network;
pub mod status;
