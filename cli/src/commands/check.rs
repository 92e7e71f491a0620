use std::sync::Arc;

use anyhow::bail;
use mcstat_common::batch::BatchResult;
use mcstat_common::config::Config;
use mcstat_core::{JavaProber, probe_all};

use crate::commands::split_addresses;
use crate::terminal::{print, spinner};

/// One-shot probe of a comma-separated list, printed as a tree or as the
/// JSON body `/check_servers` would return.
pub async fn check(addresses: &str, json: bool, cfg: Config) -> anyhow::Result<()> {
    if addresses.is_empty() {
        bail!("No addresses provided");
    }

    let addresses: Vec<String> = split_addresses(addresses);
    let prober: Arc<JavaProber> = Arc::new(JavaProber::new(cfg));

    if !json {
        spinner::start_probing(addresses.len());
    }
    let batch: BatchResult = probe_all(prober, &addresses).await;
    spinner::finish();

    if json {
        print::print(&serde_json::to_string_pretty(&batch)?);
    } else {
        print::batch(&batch);
    }
    Ok(())
}
