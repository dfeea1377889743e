//! Metrics Collectors
//!
//! This module turns Chia RPC responses into metric samples. Each submodule
//! handles one metric group: it queries one RPC (or a short fixed sequence of
//! them) and converts the response into [`Sample`]s.
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` holding the shared client and the base URL
//!   of the subsystem being queried
//! - Query the RPC endpoint
//! - Convert the response with a pure `*_samples` function
//! - Emit the samples to the scrape's [`MetricSink`] and return a
//!   [`CollectionStatus`]
//!
//! [`Collector::collect`] drives them in a fixed order, skipping the groups
//! whose endpoint is disabled.
//!
//! # Error Handling
//!
//! A failed RPC call is logged as a warning and only its own samples are
//! missing from the scrape. Nothing above the collector ever sees the error.

use crate::chia::{EndpointRegistry, RpcClient};
use crate::metrics::{MetricSink, Sample};
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};
use url::Url;

pub mod blockchain;
pub mod connections;
pub mod harvesters;
pub mod plots;
pub mod pool;
pub mod wallet;

pub use blockchain::collect_blockchain_metrics;
pub use connections::collect_connection_metrics;
pub use harvesters::collect_harvester_metrics;
pub use plots::collect_plot_metrics;
pub use pool::collect_pool_metrics;
pub use wallet::collect_wallet_metrics;

/// Shared context passed to all collectors
///
/// All fields are immutable references, so one context can be copied freely
/// between the calls of a group.
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// RPC client shared by every scrape
    pub client: &'a RpcClient,
    /// Base URL of the subsystem this group queries
    pub endpoint: &'a Url,
}

/// Status of a metrics collection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Samples were produced and emitted
    Success,
    /// The query failed; already logged as a warning
    Failed,
}

/// Outcome counts for one scrape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl CollectionReport {
    fn record(&mut self, status: CollectionStatus) {
        match status {
            CollectionStatus::Success => self.succeeded += 1,
            CollectionStatus::Failed => self.failed += 1,
        }
    }
}

/// Tri-state sync indicator shared by the full node and wallet groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    NotSynced = 0,
    Syncing = 1,
    Synced = 2,
}

impl SyncStatus {
    /// `syncing` wins over `synced` when a node reports both.
    pub fn from_flags(syncing: bool, synced: bool) -> Self {
        if syncing {
            SyncStatus::Syncing
        } else if synced {
            SyncStatus::Synced
        } else {
            SyncStatus::NotSynced
        }
    }

    pub fn value(self) -> f64 {
        self as u8 as f64
    }
}

/// Helper to reduce boilerplate in collectors
///
/// Wraps an RPC query with consistent error handling:
/// - On success: converts the response, emits the samples, returns `CollectionStatus::Success`
/// - On error: logs a warning, emits nothing, returns `CollectionStatus::Failed`
///
/// # Arguments
///
/// * `name` - Name of the metric group being collected (for logging)
/// * `query_future` - Async RPC call that returns data
/// * `sink` - Receiver for this scrape's samples
/// * `transform` - Function converting the response into samples
///
/// # Examples
///
/// ```no_run
/// # use chia_exporter::collectors::*;
/// # use chia_exporter::metrics::{self, MetricSink, Sample};
/// async fn example(ctx: &CollectionContext<'_>, sink: &mut dyn MetricSink) -> CollectionStatus {
///     collect_with_handler(
///         "plots",
///         ctx.client.get_plots(ctx.endpoint),
///         sink,
///         |plots| vec![Sample::unlabeled(&metrics::PLOTS, plots.plots.len() as f64)],
///     )
///     .await
/// }
/// ```
pub async fn collect_with_handler<T, F, P, E>(
    name: &str,
    query_future: F,
    sink: &mut dyn MetricSink,
    transform: P,
) -> CollectionStatus
where
    F: Future<Output = Result<T, E>>,
    E: Display,
    P: FnOnce(T) -> Vec<Sample>,
{
    match query_future.await {
        Ok(data) => {
            sink.emit_all(transform(data));
            debug!("Updated {} metrics", name);
            CollectionStatus::Success
        }
        Err(e) => {
            warn!("Failed to collect {} metrics: {}", name, e);
            CollectionStatus::Failed
        }
    }
}

/// Per-scrape orchestrator over the four subsystems
///
/// Holds only the shared client and the read-only endpoint registry, so
/// overlapping scrapes can run `collect` concurrently on the same instance.
#[derive(Debug, Clone)]
pub struct Collector {
    client: RpcClient,
    endpoints: EndpointRegistry,
}

impl Collector {
    pub fn new(client: RpcClient, endpoints: EndpointRegistry) -> Self {
        Self { client, endpoints }
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    /// Runs one scrape, emitting every sample that could be gathered.
    ///
    /// Groups run strictly one after another: connections, blockchain state,
    /// wallets, pool state, farmer harvesters, harvester plots. A disabled
    /// endpoint skips its groups without any call or log line.
    pub async fn collect(&self, sink: &mut dyn MetricSink) -> CollectionReport {
        let mut report = CollectionReport::default();

        if let Some(endpoint) = self.endpoints.full_node.base_url() {
            let ctx = self.context(endpoint);
            report.record(collect_connection_metrics(&ctx, sink).await);
            report.record(collect_blockchain_metrics(&ctx, sink).await);
        }

        if let Some(endpoint) = self.endpoints.wallet.base_url() {
            let ctx = self.context(endpoint);
            report.record(collect_wallet_metrics(&ctx, sink).await);
        }

        if let Some(endpoint) = self.endpoints.farmer.base_url() {
            let ctx = self.context(endpoint);
            report.record(collect_pool_metrics(&ctx, sink).await);
            report.record(collect_harvester_metrics(&ctx, sink).await);
        }

        if let Some(endpoint) = self.endpoints.harvester.base_url() {
            let ctx = self.context(endpoint);
            report.record(collect_plot_metrics(&ctx, sink).await);
        }

        report
    }

    fn context<'a>(&'a self, endpoint: &'a Url) -> CollectionContext<'a> {
        CollectionContext {
            client: &self.client,
            endpoint,
        }
    }
}
