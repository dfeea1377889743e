//! HTTP Server
//!
//! This module implements the Prometheus exporter HTTP server.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing `/metrics`, `/health`, and `/` endpoints
//! - **Collection**: every `/metrics` request runs one full collection against the node;
//!   there is no background loop and nothing is cached between scrapes
//! - **State Management**: the collector is shared through an `Arc` and holds no mutable state
//!
//! # Endpoints
//!
//! - `GET /` - Plain text banner with the exporter version
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - Liveness check, always 200
//!
//! # Error Handling
//!
//! RPC failures only remove their own metrics from the response. `/metrics`
//! answers 500 only if the gathered samples cannot be rendered.

use crate::chia::{EndpointRegistry, RpcClient};
use crate::collectors::Collector;
use crate::config::Config;
use crate::metrics::SampleSet;
use anyhow::Context;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
struct AppState {
    collector: Arc<Collector>,
}

/// Builds the collector from configuration.
///
/// Every error here is fatal: unreadable key pair, bad timeout, or an
/// endpoint that is not `https`.
pub fn build_collector(config: &Config) -> anyhow::Result<Collector> {
    let timeout = config.rpc.timeout()?;
    let endpoints =
        EndpointRegistry::from_config(&config.endpoints).context("Invalid RPC endpoint")?;
    let client = RpcClient::new(&config.tls, timeout).context("Failed to create RPC client")?;

    for (subsystem, endpoint) in endpoints.iter() {
        if endpoint.is_enabled() {
            info!("{} RPC: {}", subsystem, endpoint);
        } else {
            warn!("{} RPC disabled", subsystem);
        }
    }

    Ok(Collector::new(client, endpoints))
}

pub fn router(collector: Arc<Collector>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { collector })
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    let collector = Arc::new(build_collector(&config)?);
    let app = router(collector);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}. Serving metrics on /metrics.", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    format!(
        "chia_exporter version {}\nmetrics are published on /metrics\n",
        env!("CARGO_PKG_VERSION")
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let mut samples = SampleSet::new();
    let report = state.collector.collect(&mut samples).await;
    debug!(
        "Scrape finished: {} groups ok, {} failed, {} samples",
        report.succeeded,
        report.failed,
        samples.len()
    );

    match samples.render() {
        Ok(metrics) => (
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            metrics,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
