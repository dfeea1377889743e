//! Farmer Harvester Metrics Collector
//!
//! The farmer's aggregate view of every harvester connected to it.
//!
//! # Metrics Produced
//! - `chia_farmer_harvesters` - Number of harvesters connected to the farmer
//! - `chia_farmer_plots_failed_to_open` - Plot files that failed to open
//!   - Labels: harvester, node_id
//! - `chia_farmer_plots_no_key` - Plot files with no matching key
//!   - Labels: harvester, node_id
//! - `chia_farmer_plots` - Plots per pool key, pool contract and size
//!   - Labels: harvester, node_id, pool_public_key, pool_contract_puzzle_hash, size

use super::{collect_with_handler, CollectionContext, CollectionStatus};
use crate::chia::types::{Harvester, Harvesters, PlotEntry};
use crate::metrics::{self, MetricSink, Sample};
use std::collections::BTreeMap;

/// Grouping key for plot counts
///
/// Two plots fall in the same group when pool public key, pool contract
/// puzzle hash and k-size are all equal. Absent keys compare as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlotGroupKey {
    pub pool_public_key: String,
    pub pool_contract_puzzle_hash: String,
    pub size: u8,
}

impl From<&PlotEntry> for PlotGroupKey {
    fn from(plot: &PlotEntry) -> Self {
        Self {
            pool_public_key: plot.pool_public_key.clone(),
            pool_contract_puzzle_hash: plot.pool_contract_puzzle_hash.clone(),
            size: plot.size,
        }
    }
}

/// Counts plots per [`PlotGroupKey`], in key order.
pub fn group_plots(plots: &[PlotEntry]) -> BTreeMap<PlotGroupKey, u64> {
    let mut groups = BTreeMap::new();
    for plot in plots {
        *groups.entry(PlotGroupKey::from(plot)).or_insert(0) += 1;
    }
    groups
}

fn harvester_samples(harvester: &Harvester) -> Vec<Sample> {
    let host = harvester.connection.host.as_str();
    let node_id = harvester.connection.short_node_id();

    let mut samples = vec![
        Sample::new(
            &metrics::FARMER_PLOTS_FAILED_TO_OPEN,
            &[host, node_id],
            harvester.failed_to_open_filenames.len() as f64,
        ),
        Sample::new(
            &metrics::FARMER_PLOTS_NO_KEY,
            &[host, node_id],
            harvester.no_key_filenames.len() as f64,
        ),
    ];

    for (key, count) in group_plots(&harvester.plots) {
        let size = key.size.to_string();
        samples.push(Sample::new(
            &metrics::FARMER_PLOTS,
            &[
                host,
                node_id,
                key.pool_public_key.as_str(),
                key.pool_contract_puzzle_hash.as_str(),
                size.as_str(),
            ],
            count as f64,
        ));
    }
    samples
}

pub fn harvesters_samples(response: &Harvesters) -> Vec<Sample> {
    let mut samples = vec![Sample::unlabeled(
        &metrics::FARMER_HARVESTERS,
        response.harvesters.len() as f64,
    )];
    for harvester in &response.harvesters {
        samples.extend(harvester_samples(harvester));
    }
    samples
}

/// Collects harvester and plot metrics from the farmer
pub async fn collect_harvester_metrics(
    ctx: &CollectionContext<'_>,
    sink: &mut dyn MetricSink,
) -> CollectionStatus {
    collect_with_handler(
        "farmer harvesters",
        ctx.client.get_harvesters(ctx.endpoint),
        sink,
        |harvesters| harvesters_samples(&harvesters),
    )
    .await
}
