//! Blockchain State Metrics Collector
//!
//! # Metrics Produced
//! - `chia_blockchain_sync_status` - 0=not synced, 1=syncing, 2=synced
//! - `chia_blockchain_height` - Peak height
//! - `chia_blockchain_difficulty` - Current difficulty
//! - `chia_blockchain_space_bytes` - Estimated netspace
//! - `chia_blockchain_total_iters` - Peak total iterations

use super::{collect_with_handler, CollectionContext, CollectionStatus, SyncStatus};
use crate::chia::types::BlockchainStateResponse;
use crate::metrics::{self, MetricSink, Sample};

pub fn blockchain_samples(response: &BlockchainStateResponse) -> Vec<Sample> {
    let state = &response.blockchain_state;
    let sync = SyncStatus::from_flags(state.sync.sync_mode, state.sync.synced);

    vec![
        Sample::unlabeled(&metrics::BLOCKCHAIN_SYNC_STATUS, sync.value()),
        Sample::unlabeled(&metrics::BLOCKCHAIN_HEIGHT, state.peak.height as f64),
        Sample::unlabeled(&metrics::BLOCKCHAIN_DIFFICULTY, state.difficulty as f64),
        Sample::unlabeled(&metrics::BLOCKCHAIN_SPACE_BYTES, state.space),
        Sample::unlabeled(
            &metrics::BLOCKCHAIN_TOTAL_ITERS,
            state.peak.total_iters as f64,
        ),
    ]
}

/// Collects blockchain state metrics from the full node
pub async fn collect_blockchain_metrics(
    ctx: &CollectionContext<'_>,
    sink: &mut dyn MetricSink,
) -> CollectionStatus {
    collect_with_handler(
        "blockchain state",
        ctx.client.get_blockchain_state(ctx.endpoint),
        sink,
        |state| blockchain_samples(&state),
    )
    .await
}
