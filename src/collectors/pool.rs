//! Pool State Metrics Collector
//!
//! # Metrics Produced
//! - `chia_pool_current_difficulty` - Current difficulty on pool
//! - `chia_pool_current_points` - Current points on pool
//! - `chia_pool_points_acknowledged_24h` - Partials acknowledged in the last 24h
//! - `chia_pool_points_found_24h` - Partials found in the last 24h
//!
//! All labeled by `launcher_id` and `pool_url`. The 24h values are the number
//! of entries the farmer reports; windowing is left to the farmer.

use super::{collect_with_handler, CollectionContext, CollectionStatus};
use crate::chia::types::PoolStateResponse;
use crate::metrics::{self, MetricSink, Sample};

pub fn pool_samples(response: &PoolStateResponse) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(response.pool_state.len() * 4);
    for pool in &response.pool_state {
        let labels = [
            pool.pool_config.launcher_id.as_str(),
            pool.pool_config.pool_url.as_str(),
        ];
        samples.push(Sample::new(
            &metrics::POOL_CURRENT_DIFFICULTY,
            &labels,
            pool.current_difficulty as f64,
        ));
        samples.push(Sample::new(
            &metrics::POOL_CURRENT_POINTS,
            &labels,
            pool.current_points as f64,
        ));
        samples.push(Sample::new(
            &metrics::POOL_POINTS_ACKNOWLEDGED_24H,
            &labels,
            pool.points_acknowledged_24h.len() as f64,
        ));
        samples.push(Sample::new(
            &metrics::POOL_POINTS_FOUND_24H,
            &labels,
            pool.points_found_24h.len() as f64,
        ));
    }
    samples
}

/// Collects pool state metrics from the farmer
pub async fn collect_pool_metrics(
    ctx: &CollectionContext<'_>,
    sink: &mut dyn MetricSink,
) -> CollectionStatus {
    collect_with_handler(
        "pool state",
        ctx.client.get_pool_state(ctx.endpoint),
        sink,
        |pools| pool_samples(&pools),
    )
    .await
}
