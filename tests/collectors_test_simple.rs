//! Simplified collector tests focusing on the per-group transforms

use chia_exporter::chia::types::*;
use chia_exporter::collectors::blockchain::blockchain_samples;
use chia_exporter::collectors::connections::{connection_samples, peer_counts};
use chia_exporter::collectors::harvesters::{group_plots, harvesters_samples, PlotGroupKey};
use chia_exporter::collectors::plots::plot_file_samples;
use chia_exporter::collectors::pool::pool_samples;
use chia_exporter::collectors::wallet::{
    balance_samples, farmed_samples, select_fingerprint, sync_samples, WalletLabels,
};
use chia_exporter::collectors::{collect_with_handler, CollectionStatus, SyncStatus};
use chia_exporter::error::ExporterError;
use chia_exporter::metrics::{self, Sample};
use serde_json::json;

fn value_of(samples: &[Sample], name: &str, labels: &[&str]) -> Option<f64> {
    samples
        .iter()
        .find(|s| s.desc.name == name && s.label_values == labels)
        .map(|s| s.value)
}

fn blockchain(sync_mode: bool, synced: bool) -> BlockchainStateResponse {
    serde_json::from_value(json!({
        "blockchain_state": {
            "peak": {"height": 100, "total_iters": 5000},
            "difficulty": 2000,
            "space": 1.5e19,
            "sync": {"sync_mode": sync_mode, "synced": synced}
        }
    }))
    .expect("Failed to build blockchain state")
}

fn plot(pool: &str, contract: &str, size: u8) -> PlotEntry {
    PlotEntry {
        pool_public_key: pool.to_string(),
        pool_contract_puzzle_hash: contract.to_string(),
        size,
    }
}

#[tokio::test]
async fn test_collect_with_handler_success() {
    // Given: A successful query returning data
    let mut sink: Vec<Sample> = Vec::new();

    // When: The handler processes the query
    let status = collect_with_handler(
        "test",
        async { Ok::<u32, ExporterError>(7) },
        &mut sink,
        |n| vec![Sample::unlabeled(&metrics::PLOTS, n as f64)],
    )
    .await;

    // Then: Collection succeeds and the samples reach the sink
    assert_eq!(status, CollectionStatus::Success);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].value, 7.0);
}

#[tokio::test]
async fn test_collect_with_handler_error() {
    // Given: A query that fails
    let mut sink: Vec<Sample> = Vec::new();

    // When: The handler processes the failed query
    let status = collect_with_handler(
        "test",
        async {
            Err::<u32, ExporterError>(ExporterError::Rejected {
                endpoint: "get_plots".to_string(),
                message: "Test error".to_string(),
            })
        },
        &mut sink,
        |_data| panic!("Should not process data on error"),
    )
    .await;

    // Then: Collection fails gracefully and emits nothing
    assert_eq!(status, CollectionStatus::Failed);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_collect_with_handler_anyhow_error() {
    let mut sink: Vec<Sample> = Vec::new();
    let status = collect_with_handler(
        "test",
        async { Err::<u32, anyhow::Error>(anyhow::anyhow!("Test error")) },
        &mut sink,
        |_data| panic!("Should not process data on error"),
    )
    .await;

    assert_eq!(status, CollectionStatus::Failed);
}

#[test]
fn test_sync_status_precedence() {
    assert_eq!(SyncStatus::from_flags(true, true), SyncStatus::Syncing);
    assert_eq!(SyncStatus::from_flags(true, false), SyncStatus::Syncing);
    assert_eq!(SyncStatus::from_flags(false, true), SyncStatus::Synced);
    assert_eq!(SyncStatus::from_flags(false, false), SyncStatus::NotSynced);
    assert_eq!(SyncStatus::Syncing.value(), 1.0);
    assert_eq!(SyncStatus::Synced.value(), 2.0);
    assert_eq!(SyncStatus::NotSynced.value(), 0.0);
}

#[test]
fn test_blockchain_sync_mode_wins_over_synced() {
    // Given: A node reporting both sync flags
    let state = blockchain(true, true);

    // When: Converting to samples
    let samples = blockchain_samples(&state);

    // Then: Syncing takes precedence
    assert_eq!(value_of(&samples, "blockchain_sync_status", &[]), Some(1.0));
}

#[test]
fn test_blockchain_samples() {
    let samples = blockchain_samples(&blockchain(false, true));

    assert_eq!(samples.len(), 5);
    assert_eq!(value_of(&samples, "blockchain_sync_status", &[]), Some(2.0));
    assert_eq!(value_of(&samples, "blockchain_height", &[]), Some(100.0));
    assert_eq!(value_of(&samples, "blockchain_difficulty", &[]), Some(2000.0));
    assert_eq!(value_of(&samples, "blockchain_space_bytes", &[]), Some(1.5e19));
    assert_eq!(value_of(&samples, "blockchain_total_iters", &[]), Some(5000.0));

    let not_synced = blockchain_samples(&blockchain(false, false));
    assert_eq!(value_of(&not_synced, "blockchain_sync_status", &[]), Some(0.0));
}

#[test]
fn test_connection_samples_cover_every_node_type() {
    // Given: Only harvester peers are connected
    let conns: Connections = serde_json::from_value(json!({
        "connections": [{"type": 2}, {"type": 2}]
    }))
    .unwrap();

    // When: Converting to samples
    let samples = connection_samples(&conns);

    // Then: Every known type has a sample, zero for the unseen ones
    assert_eq!(samples.len(), NodeType::COUNT);
    assert_eq!(value_of(&samples, "peers_count", &["2"]), Some(2.0));
    for code in ["1", "3", "4", "5", "6", "7"] {
        assert_eq!(value_of(&samples, "peers_count", &[code]), Some(0.0));
    }
}

#[test]
fn test_peer_counts_skip_unknown_types() {
    let conns: Connections = serde_json::from_value(json!({
        "connections": [{"type": 1}, {"type": 0}, {"type": 42}, {"type": 7}]
    }))
    .unwrap();

    let counts = peer_counts(&conns);

    assert_eq!(counts, [1, 0, 0, 0, 0, 0, 1]);
}

#[test]
fn test_group_plots_by_pool_contract_and_size() {
    // Given: Two identical plots and one with another pool key
    let plots = vec![plot("A", "", 32), plot("A", "", 32), plot("B", "", 32)];

    // When: Grouping
    let groups = group_plots(&plots);

    // Then: Two groups with their counts
    assert_eq!(groups.len(), 2);
    let key = |pool: &str| PlotGroupKey {
        pool_public_key: pool.to_string(),
        pool_contract_puzzle_hash: String::new(),
        size: 32,
    };
    assert_eq!(groups.get(&key("A")), Some(&2));
    assert_eq!(groups.get(&key("B")), Some(&1));
}

#[test]
fn test_group_plots_separates_sizes_and_contracts() {
    let plots = vec![
        plot("A", "", 32),
        plot("A", "", 33),
        plot("A", "0xc", 32),
        plot("", "0xc", 32),
    ];

    let groups = group_plots(&plots);

    assert_eq!(groups.len(), 4);
    assert!(groups.values().all(|count| *count == 1));
}

#[test]
fn test_harvesters_samples() {
    // Given: One harvester with a long node ID and mixed plots
    let harvesters: Harvesters = serde_json::from_value(json!({
        "harvesters": [{
            "connection": {"node_id": "0123456789abcdefffff", "host": "10.0.0.5"},
            "plots": [
                {"size": 32, "pool_public_key": "A", "pool_contract_puzzle_hash": null},
                {"size": 32, "pool_public_key": "A", "pool_contract_puzzle_hash": null},
                {"size": 32, "pool_public_key": "B", "pool_contract_puzzle_hash": null}
            ],
            "failed_to_open_filenames": ["x.plot"],
            "no_key_filenames": ["y.plot", "z.plot"]
        }]
    }))
    .unwrap();

    // When: Converting to samples
    let samples = harvesters_samples(&harvesters);

    // Then: Harvester count, per-harvester file counts and grouped plots
    let node = "0123456789ab";
    assert_eq!(value_of(&samples, "farmer_harvesters", &[]), Some(1.0));
    assert_eq!(
        value_of(&samples, "farmer_plots_failed_to_open", &["10.0.0.5", node]),
        Some(1.0)
    );
    assert_eq!(
        value_of(&samples, "farmer_plots_no_key", &["10.0.0.5", node]),
        Some(2.0)
    );
    assert_eq!(
        value_of(&samples, "farmer_plots", &["10.0.0.5", node, "A", "", "32"]),
        Some(2.0)
    );
    assert_eq!(
        value_of(&samples, "farmer_plots", &["10.0.0.5", node, "B", "", "32"]),
        Some(1.0)
    );
    assert_eq!(samples.len(), 5);
}

#[test]
fn test_harvesters_samples_empty_farm() {
    let samples = harvesters_samples(&Harvesters::default());

    assert_eq!(samples.len(), 1);
    assert_eq!(value_of(&samples, "farmer_harvesters", &[]), Some(0.0));
}

#[test]
fn test_pool_samples_count_point_entries() {
    let pools: PoolStateResponse = serde_json::from_value(json!({
        "pool_state": [{
            "pool_config": {"launcher_id": "0xl1", "pool_url": "https://p1"},
            "current_difficulty": 5,
            "current_points": 300,
            "points_acknowledged_24h": [[1, 5], [2, 5]],
            "points_found_24h": [[1, 5], [2, 5], [3, 5]]
        }]
    }))
    .unwrap();

    let samples = pool_samples(&pools);
    let labels = ["0xl1", "https://p1"];

    assert_eq!(samples.len(), 4);
    assert_eq!(value_of(&samples, "pool_current_difficulty", &labels), Some(5.0));
    assert_eq!(value_of(&samples, "pool_current_points", &labels), Some(300.0));
    assert_eq!(
        value_of(&samples, "pool_points_acknowledged_24h", &labels),
        Some(2.0)
    );
    assert_eq!(value_of(&samples, "pool_points_found_24h", &labels), Some(3.0));
}

#[test]
fn test_plot_file_samples() {
    let plots: PlotFiles = serde_json::from_value(json!({
        "plots": [{"size": 32}, {"size": 32}, {"size": 33}],
        "failed_to_open_filenames": ["a"],
        "not_found_filenames": []
    }))
    .unwrap();

    let samples = plot_file_samples(&plots);

    assert_eq!(value_of(&samples, "plots", &[]), Some(3.0));
    assert_eq!(value_of(&samples, "plots_failed_to_open", &[]), Some(1.0));
    assert_eq!(value_of(&samples, "plots_not_found", &[]), Some(0.0));
}

#[test]
fn test_select_fingerprint() {
    let none = PublicKeys::default();
    let one = PublicKeys {
        public_key_fingerprints: vec![3_000_000_001],
    };
    let many = PublicKeys {
        public_key_fingerprints: vec![11, 22],
    };

    assert_eq!(select_fingerprint(1, &none), "");
    assert_eq!(select_fingerprint(1, &one), "3000000001");
    assert_eq!(select_fingerprint(1, &many), "11");
}

#[test]
fn test_wallet_samples_carry_wallet_labels() {
    let labels = WalletLabels::new(3, "99");
    let balance: WalletBalanceResponse = serde_json::from_value(json!({
        "wallet_balance": {
            "confirmed_wallet_balance": 10,
            "unconfirmed_wallet_balance": 11,
            "spendable_balance": 9,
            "max_send_amount": 8,
            "pending_change": 1
        }
    }))
    .unwrap();
    let farmed: FarmedAmount = serde_json::from_value(json!({
        "farmed_amount": 100,
        "reward_amount": 20,
        "fee_amount": 1,
        "last_height_farmed": 77,
        "pool_reward_amount": 80
    }))
    .unwrap();
    let status = WalletSyncStatus {
        syncing: false,
        synced: true,
    };

    let mut samples = balance_samples(&labels, &balance);
    samples.extend(sync_samples(&labels, &status));
    samples.extend(farmed_samples(&labels, &farmed));

    let wallet = ["3", "99"];
    assert_eq!(samples.len(), 11);
    assert_eq!(
        value_of(&samples, "wallet_confirmed_balance_mojo", &wallet),
        Some(10.0)
    );
    assert_eq!(
        value_of(&samples, "wallet_unconfirmed_balance_mojo", &wallet),
        Some(11.0)
    );
    assert_eq!(
        value_of(&samples, "wallet_spendable_balance_mojo", &wallet),
        Some(9.0)
    );
    assert_eq!(value_of(&samples, "wallet_max_send_mojo", &wallet), Some(8.0));
    assert_eq!(
        value_of(&samples, "wallet_pending_change_mojo", &wallet),
        Some(1.0)
    );
    assert_eq!(value_of(&samples, "wallet_sync_status", &wallet), Some(2.0));
    assert_eq!(value_of(&samples, "wallet_farmed_amount", &wallet), Some(100.0));
    assert_eq!(value_of(&samples, "wallet_reward_amount", &wallet), Some(20.0));
    assert_eq!(value_of(&samples, "wallet_fee_amount", &wallet), Some(1.0));
    assert_eq!(
        value_of(&samples, "wallet_last_height_farmed", &wallet),
        Some(77.0)
    );
    assert_eq!(
        value_of(&samples, "wallet_pool_reward_amount", &wallet),
        Some(80.0)
    );
}
