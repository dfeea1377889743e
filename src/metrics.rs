//! Prometheus Metrics Definitions
//!
//! This module defines every metric exposed by the Chia exporter and the sink
//! that turns one scrape's samples into Prometheus text format.
//!
//! # Metric Categories
//!
//! ## Full Node
//! - Peer connections by node type
//! - Sync status, peak height, difficulty, netspace, total iterations
//!
//! ## Wallet (labeled by wallet ID and key fingerprint)
//! - Confirmed, unconfirmed and spendable balance, max send, pending change
//! - Sync status and synced height
//! - Farmed, reward, fee and pool reward amounts, last height farmed
//!
//! ## Farmer
//! - Pool difficulty, points and 24h partials per pool
//! - Connected harvesters and their plots
//!
//! ## Harvester
//! - Loaded, failed and missing plot files
//!
//! # Design
//!
//! Descriptors are `static` values built at compile time and only read
//! afterwards. Nothing is stored between scrapes: each scrape emits [`Sample`]s
//! into a fresh [`SampleSet`], which renders them through a throwaway registry.
//!
//! All metrics are gauges and use the `chia_` namespace prefix.

use crate::error::{ExporterError, Result};
use prometheus::{GaugeVec, Opts, Registry, TextEncoder};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

pub const NAMESPACE: &str = "chia";

/// Name, help text and label names of one gauge.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

impl MetricDesc {
    /// Name as it appears in the exposition, including the namespace.
    pub fn full_name(&self) -> String {
        format!("{}_{}", NAMESPACE, self.name)
    }
}

const WALLET_LABELS: &[&str] = &["wallet_id", "wallet_fingerprint"];
const POOL_LABELS: &[&str] = &["launcher_id", "pool_url"];
const HARVESTER_LABELS: &[&str] = &["harvester", "node_id"];

// Full node

pub static PEERS_COUNT: MetricDesc = MetricDesc {
    name: "peers_count",
    help: "Number of peers currently connected.",
    labels: &["type"],
};

pub static BLOCKCHAIN_SYNC_STATUS: MetricDesc = MetricDesc {
    name: "blockchain_sync_status",
    help: "Sync status, 0=not synced, 1=syncing, 2=synced",
    labels: &[],
};

pub static BLOCKCHAIN_HEIGHT: MetricDesc = MetricDesc {
    name: "blockchain_height",
    help: "Current height",
    labels: &[],
};

pub static BLOCKCHAIN_DIFFICULTY: MetricDesc = MetricDesc {
    name: "blockchain_difficulty",
    help: "Current difficulty",
    labels: &[],
};

pub static BLOCKCHAIN_SPACE_BYTES: MetricDesc = MetricDesc {
    name: "blockchain_space_bytes",
    help: "Estimated current netspace",
    labels: &[],
};

pub static BLOCKCHAIN_TOTAL_ITERS: MetricDesc = MetricDesc {
    name: "blockchain_total_iters",
    help: "Current total iterations",
    labels: &[],
};

// Wallet

pub static WALLET_CONFIRMED_BALANCE: MetricDesc = MetricDesc {
    name: "wallet_confirmed_balance_mojo",
    help: "Confirmed wallet balance.",
    labels: WALLET_LABELS,
};

pub static WALLET_UNCONFIRMED_BALANCE: MetricDesc = MetricDesc {
    name: "wallet_unconfirmed_balance_mojo",
    help: "Unconfirmed wallet balance.",
    labels: WALLET_LABELS,
};

pub static WALLET_SPENDABLE_BALANCE: MetricDesc = MetricDesc {
    name: "wallet_spendable_balance_mojo",
    help: "Spendable wallet balance.",
    labels: WALLET_LABELS,
};

pub static WALLET_MAX_SEND: MetricDesc = MetricDesc {
    name: "wallet_max_send_mojo",
    help: "Maximum sendable amount.",
    labels: WALLET_LABELS,
};

pub static WALLET_PENDING_CHANGE: MetricDesc = MetricDesc {
    name: "wallet_pending_change_mojo",
    help: "Pending change amount.",
    labels: WALLET_LABELS,
};

pub static WALLET_SYNC_STATUS: MetricDesc = MetricDesc {
    name: "wallet_sync_status",
    help: "Sync status, 0=not synced, 1=syncing, 2=synced",
    labels: WALLET_LABELS,
};

pub static WALLET_HEIGHT: MetricDesc = MetricDesc {
    name: "wallet_height",
    help: "Wallet synced height.",
    labels: WALLET_LABELS,
};

pub static WALLET_FARMED_AMOUNT: MetricDesc = MetricDesc {
    name: "wallet_farmed_amount",
    help: "Farmed amount",
    labels: WALLET_LABELS,
};

pub static WALLET_REWARD_AMOUNT: MetricDesc = MetricDesc {
    name: "wallet_reward_amount",
    help: "Reward amount",
    labels: WALLET_LABELS,
};

pub static WALLET_FEE_AMOUNT: MetricDesc = MetricDesc {
    name: "wallet_fee_amount",
    help: "Fee amount",
    labels: WALLET_LABELS,
};

pub static WALLET_LAST_HEIGHT_FARMED: MetricDesc = MetricDesc {
    name: "wallet_last_height_farmed",
    help: "Last height farmed",
    labels: WALLET_LABELS,
};

pub static WALLET_POOL_REWARD_AMOUNT: MetricDesc = MetricDesc {
    name: "wallet_pool_reward_amount",
    help: "Pool reward amount",
    labels: WALLET_LABELS,
};

// Farmer

pub static POOL_CURRENT_DIFFICULTY: MetricDesc = MetricDesc {
    name: "pool_current_difficulty",
    help: "Current difficulty on pool.",
    labels: POOL_LABELS,
};

pub static POOL_CURRENT_POINTS: MetricDesc = MetricDesc {
    name: "pool_current_points",
    help: "Current points on pool.",
    labels: POOL_LABELS,
};

pub static POOL_POINTS_ACKNOWLEDGED_24H: MetricDesc = MetricDesc {
    name: "pool_points_acknowledged_24h",
    help: "Points acknowledged last 24h on pool.",
    labels: POOL_LABELS,
};

pub static POOL_POINTS_FOUND_24H: MetricDesc = MetricDesc {
    name: "pool_points_found_24h",
    help: "Points found last 24h on pool.",
    labels: POOL_LABELS,
};

pub static FARMER_HARVESTERS: MetricDesc = MetricDesc {
    name: "farmer_harvesters",
    help: "Number of harvesters connected to the farmer.",
    labels: &[],
};

pub static FARMER_PLOTS_FAILED_TO_OPEN: MetricDesc = MetricDesc {
    name: "farmer_plots_failed_to_open",
    help: "Number of plot files failed to open.",
    labels: HARVESTER_LABELS,
};

pub static FARMER_PLOTS_NO_KEY: MetricDesc = MetricDesc {
    name: "farmer_plots_no_key",
    help: "Number of plots with no key.",
    labels: HARVESTER_LABELS,
};

pub static FARMER_PLOTS: MetricDesc = MetricDesc {
    name: "farmer_plots",
    help: "Number of plots currently harvesting.",
    labels: &[
        "harvester",
        "node_id",
        "pool_public_key",
        "pool_contract_puzzle_hash",
        "size",
    ],
};

// Harvester

pub static PLOTS_FAILED_TO_OPEN: MetricDesc = MetricDesc {
    name: "plots_failed_to_open",
    help: "Number of plots files failed to open.",
    labels: &[],
};

pub static PLOTS_NOT_FOUND: MetricDesc = MetricDesc {
    name: "plots_not_found",
    help: "Number of plots files not found.",
    labels: &[],
};

pub static PLOTS: MetricDesc = MetricDesc {
    name: "plots",
    help: "Number of plots currently using.",
    labels: &[],
};

/// Every descriptor the exporter can emit.
pub static ALL: &[&MetricDesc] = &[
    &PEERS_COUNT,
    &BLOCKCHAIN_SYNC_STATUS,
    &BLOCKCHAIN_HEIGHT,
    &BLOCKCHAIN_DIFFICULTY,
    &BLOCKCHAIN_SPACE_BYTES,
    &BLOCKCHAIN_TOTAL_ITERS,
    &WALLET_CONFIRMED_BALANCE,
    &WALLET_UNCONFIRMED_BALANCE,
    &WALLET_SPENDABLE_BALANCE,
    &WALLET_MAX_SEND,
    &WALLET_PENDING_CHANGE,
    &WALLET_SYNC_STATUS,
    &WALLET_HEIGHT,
    &WALLET_FARMED_AMOUNT,
    &WALLET_REWARD_AMOUNT,
    &WALLET_FEE_AMOUNT,
    &WALLET_LAST_HEIGHT_FARMED,
    &WALLET_POOL_REWARD_AMOUNT,
    &POOL_CURRENT_DIFFICULTY,
    &POOL_CURRENT_POINTS,
    &POOL_POINTS_ACKNOWLEDGED_24H,
    &POOL_POINTS_FOUND_24H,
    &FARMER_HARVESTERS,
    &FARMER_PLOTS_FAILED_TO_OPEN,
    &FARMER_PLOTS_NO_KEY,
    &FARMER_PLOTS,
    &PLOTS_FAILED_TO_OPEN,
    &PLOTS_NOT_FOUND,
    &PLOTS,
];

/// One gauge value with its label values, in descriptor label order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub desc: &'static MetricDesc,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl Sample {
    pub fn new(desc: &'static MetricDesc, label_values: &[&str], value: f64) -> Self {
        debug_assert_eq!(
            desc.labels.len(),
            label_values.len(),
            "label count mismatch for {}",
            desc.name
        );
        Self {
            desc,
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
            value,
        }
    }

    /// Sample for a descriptor without labels.
    pub fn unlabeled(desc: &'static MetricDesc, value: f64) -> Self {
        Self::new(desc, &[], value)
    }
}

/// Receiver of the samples produced by one scrape.
pub trait MetricSink: Send {
    fn emit(&mut self, sample: Sample);

    fn emit_all(&mut self, samples: Vec<Sample>) {
        for sample in samples {
            self.emit(sample);
        }
    }
}

impl MetricSink for Vec<Sample> {
    fn emit(&mut self, sample: Sample) {
        self.push(sample);
    }
}

/// Samples gathered during one scrape
#[derive(Debug, Default)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Render samples in Prometheus text format
    ///
    /// Fails if the same metric and label values were emitted twice, or if a
    /// sample's label count does not match its descriptor.
    pub fn render(&self) -> Result<String> {
        let registry = Registry::new();
        let mut families: HashMap<&'static str, GaugeVec> = HashMap::new();
        let mut seen: HashSet<(&'static str, &[String])> = HashSet::new();

        for sample in &self.samples {
            if !seen.insert((sample.desc.name, sample.label_values.as_slice())) {
                return Err(ExporterError::DuplicateSample {
                    name: sample.desc.full_name(),
                    labels: sample.label_values.clone(),
                });
            }

            let gauge = match families.entry(sample.desc.name) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let gauge = GaugeVec::new(
                        Opts::new(sample.desc.name, sample.desc.help).namespace(NAMESPACE),
                        sample.desc.labels,
                    )?;
                    registry.register(Box::new(gauge.clone()))?;
                    entry.insert(gauge)
                }
            };
            let labels: Vec<&str> = sample.label_values.iter().map(String::as_str).collect();
            gauge
                .get_metric_with_label_values(&labels)?
                .set(sample.value);
        }

        let encoder = TextEncoder::new();
        let metric_families = registry.gather();
        Ok(encoder.encode_to_string(&metric_families)?)
    }
}

impl MetricSink for SampleSet {
    fn emit(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}
