//! Edge case tests
//!
//! Tests for unusual node responses and label values.

use chia_exporter::chia::types::*;
use chia_exporter::collectors::connections::connection_samples;
use chia_exporter::collectors::harvesters::harvesters_samples;
use chia_exporter::collectors::pool::pool_samples;
use chia_exporter::collectors::wallet::{balance_samples, WalletLabels};
use chia_exporter::metrics::{self, MetricSink, Sample, SampleSet};
use serde_json::json;

fn render(samples: Vec<Sample>) -> String {
    let mut set = SampleSet::new();
    set.emit_all(samples);
    set.render().expect("Failed to render")
}

#[test]
fn test_empty_connection_list_exports_zeros() {
    // Given: A node with no peers
    let conns: Connections = serde_json::from_value(json!({"connections": []})).unwrap();

    // When: Rendering its samples
    let rendered = render(connection_samples(&conns));

    // Then: Every known type is present with zero
    for code in 1..=7 {
        assert!(rendered.contains(&format!("chia_peers_count{{type=\"{}\"}} 0", code)));
    }
}

#[test]
fn test_null_connection_list() {
    let conns: Connections = serde_json::from_value(json!({"connections": null})).unwrap();
    assert!(conns.connections.is_empty());
    assert_eq!(connection_samples(&conns).len(), 7);
}

#[test]
fn test_unicode_node_id_is_cut_on_char_boundary() {
    // Given: A node ID with multi-byte characters
    let conn = HarvesterConnection {
        node_id: "ééééééééééééééé".to_string(),
        host: "h".to_string(),
    };

    // When: Shortening it
    let short = conn.short_node_id();

    // Then: Twelve characters, no panic on a byte boundary
    assert_eq!(short.chars().count(), 12);
    assert_eq!(short, "éééééééééééé");
}

#[test]
fn test_exactly_twelve_char_node_id_is_unchanged() {
    let conn = HarvesterConnection {
        node_id: "0123456789ab".to_string(),
        host: "h".to_string(),
    };
    assert_eq!(conn.short_node_id(), "0123456789ab");
}

#[test]
fn test_empty_node_id() {
    let conn = HarvesterConnection {
        node_id: String::new(),
        host: "h".to_string(),
    };
    assert_eq!(conn.short_node_id(), "");
}

#[test]
fn test_harvester_without_plots() {
    // Given: A connected harvester with no plot lists at all
    let response: Harvesters = serde_json::from_value(json!({
        "harvesters": [{"connection": {"node_id": "abcdef", "host": "10.0.0.9"}}]
    }))
    .unwrap();

    // When: Converting
    let samples = harvesters_samples(&response);

    // Then: Count, failed and no-key samples only
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.desc.name != metrics::FARMER_PLOTS.name));
}

#[test]
fn test_harvester_without_node_id_fails_to_decode() {
    let result = serde_json::from_value::<Harvesters>(json!({
        "harvesters": [{"connection": {"host": "10.0.0.9"}}]
    }));
    assert!(result.is_err());
}

#[test]
fn test_pool_with_null_url() {
    // Given: A pool whose URL is not configured yet
    let response: PoolStateResponse = serde_json::from_value(json!({
        "pool_state": [{
            "pool_config": {"launcher_id": "0xabc", "pool_url": null},
            "current_points": null,
            "points_found_24h": null
        }]
    }))
    .unwrap();

    // When: Rendering
    let rendered = render(pool_samples(&response));

    // Then: The empty URL is still a valid label value
    assert!(rendered.contains("pool_url=\"\""));
    assert!(rendered.contains("launcher_id=\"0xabc\""));
}

#[test]
fn test_pool_without_launcher_id_fails_to_decode() {
    let result = serde_json::from_value::<PoolStateResponse>(json!({
        "pool_state": [{"pool_config": {"pool_url": "https://pool"}}]
    }));
    assert!(result.is_err());
}

#[test]
fn test_label_values_with_quotes_are_escaped() {
    let mut set = SampleSet::new();
    set.emit(Sample::new(
        &metrics::POOL_CURRENT_POINTS,
        &["0x\"quoted\"", "https://pool/a\\b"],
        1.0,
    ));

    let rendered = set.render().expect("Failed to render");

    assert!(rendered.contains("launcher_id=\"0x\\\"quoted\\\"\""));
    assert!(rendered.contains("pool_url=\"https://pool/a\\\\b\""));
}

#[test]
fn test_large_mojo_balances() {
    // Given: A balance near the top of the u64 range
    let response: WalletBalanceResponse = serde_json::from_value(json!({
        "wallet_balance": {"confirmed_wallet_balance": 18_000_000_000_000_000_000u64}
    }))
    .unwrap();

    // When: Converting
    let samples = balance_samples(&WalletLabels::new(1, "42"), &response);

    // Then: The value survives as a float
    assert_eq!(samples[0].value, 1.8e19);
    assert!(render(samples).contains("chia_wallet_confirmed_balance_mojo"));
}

#[test]
fn test_zero_values_are_exported() {
    let response = WalletBalanceResponse::default();

    let rendered = render(balance_samples(&WalletLabels::new(1, ""), &response));

    assert!(rendered.contains("chia_wallet_spendable_balance_mojo{"));
    assert!(rendered.contains("} 0"));
}

#[test]
fn test_unsuccessful_envelope_fields_are_optional() {
    let status: RpcStatus = serde_json::from_value(json!({})).unwrap();
    assert!(status.success);
    assert_eq!(status.error, "");

    let status: RpcStatus =
        serde_json::from_value(json!({"success": false, "error": null})).unwrap();
    assert!(!status.success);
}
