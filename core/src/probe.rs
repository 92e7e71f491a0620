//! # Probe Orchestrator
//!
//! Fans a batch of raw addresses out to one task each and gathers the
//! outcomes back in input order.
//!
//! Every task owns a copy of the read-only [`Config`] and computes its own
//! deadline, so one slow target only ever costs its own budget.

use std::sync::Arc;

use async_trait::async_trait;
use mcstat_common::batch::{self, BatchResult};
use mcstat_common::config::Config;
use mcstat_common::error::ProbeError;
use mcstat_common::network::target::Target;
use mcstat_common::status::{ProbeResult, Status};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, info_span, warn};

use crate::network::tcp::Connection;
use crate::query;
use crate::resolver::AddressResolver;

/// Something able to turn one raw address into a [`ProbeResult`].
///
/// Implementations must not fail: every error is reported in the result.
#[async_trait]
pub trait StatusProber: Send + Sync {
    async fn probe(&self, raw: &str) -> ProbeResult;
}

/// Probes Java edition servers with the Server List Ping exchange.
#[derive(Debug, Clone)]
pub struct JavaProber {
    cfg: Config,
    resolver: AddressResolver,
}

impl JavaProber {
    pub fn new(cfg: Config) -> Self {
        let resolver: AddressResolver = AddressResolver::new(&cfg);
        Self { cfg, resolver }
    }

    /// resolve → connect → query, all under one deadline.
    pub async fn query(&self, raw: &str) -> Result<Status, ProbeError> {
        let deadline: Instant = Instant::now() + self.cfg.timeout;
        let target: Target = self.resolver.resolve(raw, deadline).await?;
        let mut conn: Connection = Connection::open(&target, deadline, self.cfg.timeout).await?;
        query::handshake_and_query(&mut conn, &target).await
    }
}

#[async_trait]
impl StatusProber for JavaProber {
    async fn probe(&self, raw: &str) -> ProbeResult {
        let result: Result<Status, ProbeError> = self.query(raw).await;
        if let Err(e) = &result {
            warn!("{e}");
        }
        result.into()
    }
}

/// Probes every address concurrently and aggregates the outcomes.
///
/// The result has one entry per distinct raw string, in first-seen order,
/// holding the outcome of its last occurrence.
pub async fn probe_all<P>(prober: Arc<P>, raw_addresses: &[String]) -> BatchResult
where
    P: StatusProber + 'static,
{
    let handles: Vec<(String, JoinHandle<ProbeResult>)> = raw_addresses
        .iter()
        .map(|raw| {
            let prober: Arc<P> = Arc::clone(&prober);
            let task_raw: String = raw.clone();
            let span = info_span!("probe", address = %raw);
            let handle: JoinHandle<ProbeResult> =
                tokio::spawn(async move { prober.probe(&task_raw).await }.instrument(span));
            (raw.clone(), handle)
        })
        .collect();

    let mut pairs: Vec<(String, ProbeResult)> = Vec::with_capacity(handles.len());
    for (raw, handle) in handles {
        let result: ProbeResult = match handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!("probe task for {raw} did not finish: {e}");
                ProbeResult::failure(format!("probe task failed: {e}"))
            }
        };
        pairs.push((raw, result));
    }

    batch::aggregate(pairs)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
