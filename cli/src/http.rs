//! HTTP front door.
//!
//! * `GET /check_servers?address=a,b:25566,...` probes every token and
//!   answers with a JSON object keyed by the raw tokens.
//! * A missing or empty `address` is rejected with `400` before any probing.
//!   Only the first `address` pair counts, and undecodable bytes are
//!   replaced rather than rejected.
//! * Every response carries permissive CORS headers; anything else is `404`.

use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mcstat_common::batch::BatchResult;
use mcstat_core::probe::{self, StatusProber};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::commands::split_addresses;

pub struct AppState<P> {
    pub prober: Arc<P>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            prober: Arc::clone(&self.prober),
        }
    }
}

pub fn build_router<P>(prober: Arc<P>) -> Router
where
    P: StatusProber + 'static,
{
    Router::new()
        .route("/check_servers", get(check_servers::<P>))
        .fallback(not_found)
        .with_state(AppState { prober })
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers([header::CONTENT_TYPE]),
        )
        // CorsLayer only lists methods on preflight answers
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET"),
        ))
}

// GET /check_servers
async fn check_servers<P>(
    State(app): State<AppState<P>>,
    RawQuery(query): RawQuery,
) -> Response
where
    P: StatusProber + 'static,
{
    let Some(list) = query.as_deref().and_then(first_address).filter(|list| !list.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No addresses provided" })),
        )
            .into_response();
    };

    let addresses: Vec<String> = split_addresses(&list);
    info!("checking {} address(es)", addresses.len());
    let batch: BatchResult = probe::probe_all(app.prober, &addresses).await;
    Json(batch).into_response()
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// Value of the first `address` pair in a raw query string.
fn first_address(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "address")
        .map(|(_, value)| value.into_owned())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
