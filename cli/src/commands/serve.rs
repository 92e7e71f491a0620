use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use mcstat_common::config::Config;
use mcstat_core::JavaProber;
use tokio::net::TcpListener;
use tracing::info;

use crate::http;

pub async fn serve(bind: SocketAddr, cfg: Config) -> anyhow::Result<()> {
    let listener: TcpListener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("could not bind {bind}"))?;
    let local: SocketAddr = listener.local_addr()?;

    info!(
        "listening on http://{local} (timeout {}ms, SRV lookups {})",
        cfg.timeout.as_millis(),
        if cfg.srv_lookup { "on" } else { "off" }
    );

    let prober: Arc<JavaProber> = Arc::new(JavaProber::new(cfg));
    axum::serve(listener, http::build_router(prober))
        .await
        .context("HTTP server stopped")
}
