//! Peer Connection Metrics Collector
//!
//! Counts the full node's peer connections by node type.
//!
//! # Metrics Produced
//! - `chia_peers_count` - Number of peers currently connected
//!   - Labels: type (node type code, `1`..`7`)
//!
//! A sample is emitted for every known node type, zero included, so the
//! label set stays the same from one scrape to the next.

use super::{collect_with_handler, CollectionContext, CollectionStatus};
use crate::chia::types::{Connections, NodeType};
use crate::metrics::{self, MetricSink, Sample};
use tracing::debug;

/// Peer counts indexed in [`NodeType::ALL`] order.
///
/// Connections reporting a type outside the known set are skipped.
pub fn peer_counts(connections: &Connections) -> [u64; NodeType::COUNT] {
    let mut counts = [0u64; NodeType::COUNT];
    for conn in &connections.connections {
        match NodeType::from_code(conn.node_type) {
            Some(node_type) => counts[node_type.code() as usize - 1] += 1,
            None => debug!(
                "Ignoring peer {} with unknown node type {}",
                conn.peer_host, conn.node_type
            ),
        }
    }
    counts
}

pub fn connection_samples(connections: &Connections) -> Vec<Sample> {
    NodeType::ALL
        .iter()
        .zip(peer_counts(connections))
        .map(|(node_type, count)| {
            let code = node_type.code().to_string();
            Sample::new(&metrics::PEERS_COUNT, &[code.as_str()], count as f64)
        })
        .collect()
}

/// Collects peer connection metrics from the full node
pub async fn collect_connection_metrics(
    ctx: &CollectionContext<'_>,
    sink: &mut dyn MetricSink,
) -> CollectionStatus {
    collect_with_handler(
        "connections",
        ctx.client.get_connections(ctx.endpoint),
        sink,
        |connections| connection_samples(&connections),
    )
    .await
}
