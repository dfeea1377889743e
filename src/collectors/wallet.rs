//! Wallet Metrics Collector
//!
//! Enumerates the wallets known to the wallet service, then runs the same
//! sequence of calls for each one: public key, balance, sync status (plus
//! synced height), farmed amount.
//!
//! # Metrics Produced
//!
//! All labeled by `wallet_id` and `wallet_fingerprint`.
//!
//! - `chia_wallet_confirmed_balance_mojo`, `chia_wallet_unconfirmed_balance_mojo`,
//!   `chia_wallet_spendable_balance_mojo`, `chia_wallet_max_send_mojo`,
//!   `chia_wallet_pending_change_mojo` - from `get_wallet_balance`
//! - `chia_wallet_sync_status` - 0=not synced, 1=syncing, 2=synced
//! - `chia_wallet_height` - Synced height, only after a successful sync query
//! - `chia_wallet_farmed_amount`, `chia_wallet_reward_amount`,
//!   `chia_wallet_fee_amount`, `chia_wallet_last_height_farmed`,
//!   `chia_wallet_pool_reward_amount` - from `get_farmed_amount`

use super::{CollectionContext, CollectionStatus, SyncStatus};
use crate::chia::types::{
    FarmedAmount, HeightInfo, PublicKeys, WalletBalanceResponse, WalletSyncStatus,
};
use crate::error::ExporterError;
use crate::metrics::{self, MetricSink, Sample};
use tracing::{debug, warn};

/// Label values shared by every sample of one wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLabels {
    pub wallet_id: String,
    pub fingerprint: String,
}

impl WalletLabels {
    pub fn new(wallet_id: u32, fingerprint: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.to_string(),
            fingerprint: fingerprint.into(),
        }
    }

    fn values(&self) -> [&str; 2] {
        [self.wallet_id.as_str(), self.fingerprint.as_str()]
    }

    fn sample(&self, desc: &'static metrics::MetricDesc, value: f64) -> Sample {
        Sample::new(desc, &self.values(), value)
    }
}

/// Samples and failed calls of one wallet's pipeline.
#[derive(Debug)]
pub struct WalletReport {
    pub wallet_id: u32,
    pub samples: Vec<Sample>,
    pub failures: Vec<ExporterError>,
}

/// Fingerprint of the wallet's first public key, or an empty string.
pub fn select_fingerprint(wallet_id: u32, keys: &PublicKeys) -> String {
    match keys.public_key_fingerprints.as_slice() {
        [] => {
            warn!("Wallet {} has no public key", wallet_id);
            String::new()
        }
        [first] => first.to_string(),
        [first, ..] => {
            warn!(
                "Wallet {} has more than one public key; using the first",
                wallet_id
            );
            first.to_string()
        }
    }
}

pub fn balance_samples(labels: &WalletLabels, response: &WalletBalanceResponse) -> Vec<Sample> {
    let balance = &response.wallet_balance;
    vec![
        labels.sample(&metrics::WALLET_CONFIRMED_BALANCE, balance.confirmed as f64),
        labels.sample(&metrics::WALLET_UNCONFIRMED_BALANCE, balance.unconfirmed as f64),
        labels.sample(&metrics::WALLET_SPENDABLE_BALANCE, balance.spendable as f64),
        labels.sample(&metrics::WALLET_MAX_SEND, balance.max_send_amount as f64),
        labels.sample(&metrics::WALLET_PENDING_CHANGE, balance.pending_change as f64),
    ]
}

pub fn sync_samples(labels: &WalletLabels, status: &WalletSyncStatus) -> Vec<Sample> {
    let sync = SyncStatus::from_flags(status.syncing, status.synced);
    vec![labels.sample(&metrics::WALLET_SYNC_STATUS, sync.value())]
}

pub fn height_samples(labels: &WalletLabels, info: &HeightInfo) -> Vec<Sample> {
    vec![labels.sample(&metrics::WALLET_HEIGHT, info.height as f64)]
}

pub fn farmed_samples(labels: &WalletLabels, farmed: &FarmedAmount) -> Vec<Sample> {
    vec![
        labels.sample(&metrics::WALLET_FARMED_AMOUNT, farmed.farmed_amount as f64),
        labels.sample(&metrics::WALLET_REWARD_AMOUNT, farmed.reward_amount as f64),
        labels.sample(&metrics::WALLET_FEE_AMOUNT, farmed.fee_amount as f64),
        labels.sample(
            &metrics::WALLET_LAST_HEIGHT_FARMED,
            farmed.last_height_farmed as f64,
        ),
        labels.sample(
            &metrics::WALLET_POOL_REWARD_AMOUNT,
            farmed.pool_reward_amount as f64,
        ),
    ]
}

/// Runs every per-wallet call for one wallet
///
/// Each call is independent of the others' failures, except that the synced
/// height is only queried after a successful sync status call. A failed key
/// lookup leaves the fingerprint label empty.
pub async fn wallet_pipeline(ctx: &CollectionContext<'_>, wallet_id: u32) -> WalletReport {
    let mut samples = Vec::new();
    let mut failures = Vec::new();

    let fingerprint = match ctx.client.get_public_keys(ctx.endpoint, wallet_id).await {
        Ok(keys) => select_fingerprint(wallet_id, &keys),
        Err(e) => {
            failures.push(e);
            String::new()
        }
    };
    let labels = WalletLabels::new(wallet_id, fingerprint);

    match ctx.client.get_wallet_balance(ctx.endpoint, wallet_id).await {
        Ok(balance) => samples.extend(balance_samples(&labels, &balance)),
        Err(e) => failures.push(e),
    }

    match ctx.client.get_sync_status(ctx.endpoint, wallet_id).await {
        Ok(status) => {
            samples.extend(sync_samples(&labels, &status));
            match ctx.client.get_height_info(ctx.endpoint, wallet_id).await {
                Ok(info) => samples.extend(height_samples(&labels, &info)),
                Err(e) => failures.push(e),
            }
        }
        Err(e) => failures.push(e),
    }

    match ctx.client.get_farmed_amount(ctx.endpoint, wallet_id).await {
        Ok(farmed) => samples.extend(farmed_samples(&labels, &farmed)),
        Err(e) => failures.push(e),
    }

    WalletReport {
        wallet_id,
        samples,
        failures,
    }
}

/// Collects metrics for every wallet on the wallet service
///
/// Returns `Failed` only when the wallet list itself cannot be fetched.
/// Per-wallet failures are logged and leave the other wallets untouched.
pub async fn collect_wallet_metrics(
    ctx: &CollectionContext<'_>,
    sink: &mut dyn MetricSink,
) -> CollectionStatus {
    let wallets = match ctx.client.get_wallets(ctx.endpoint).await {
        Ok(wallets) => wallets.wallets,
        Err(e) => {
            warn!("Failed to collect wallet metrics: {}", e);
            return CollectionStatus::Failed;
        }
    };

    for wallet in &wallets {
        let report = wallet_pipeline(ctx, wallet.id).await;
        for failure in &report.failures {
            warn!("Wallet {} ({}): {}", report.wallet_id, wallet.name, failure);
        }
        sink.emit_all(report.samples);
    }

    debug!("Updated wallet metrics for {} wallets", wallets.len());
    CollectionStatus::Success
}
