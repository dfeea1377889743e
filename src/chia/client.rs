//! Chia RPC Client
//!
//! Every node subsystem (full node, wallet, farmer, harvester) runs an HTTPS
//! RPC server. A call is a single `POST {base}/{rpc}` with a JSON object body
//! and a JSON object response.
//!
//! # Architecture
//!
//! - **Transport**: one shared `reqwest::Client` with connection pooling
//! - **Authentication**: mutual TLS with the node's private certificate/key pair
//! - **Timeout**: one flat duration applied to each whole round trip
//! - **Retries**: none; the caller decides what a failure means
//!
//! # Example
//!
//! ```no_run
//! use chia_exporter::chia::RpcClient;
//! use chia_exporter::config::TlsConfig;
//! use std::time::Duration;
//! use url::Url;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RpcClient::new(&TlsConfig::default(), Duration::from_secs(5))?;
//! let full_node = Url::parse("https://localhost:8555")?;
//! let state = client.get_blockchain_state(&full_node).await?;
//! println!("height {}", state.blockchain_state.peak.height);
//! # Ok(())
//! # }
//! ```

use crate::chia::types::*;
use crate::config::{expand_path, TlsConfig};
use crate::error::{ExporterError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Body sent to RPCs that take no parameters. The servers insist on a JSON
/// object even when it is not read.
pub fn empty_body() -> Value {
    json!({"": ""})
}

pub fn wallet_body(wallet_id: u32) -> Value {
    json!({ "wallet_id": wallet_id })
}

/// Client for the Chia RPC servers
///
/// Holds no per-call state, so one instance is shared by all concurrent
/// scrapes. Calls on it are independent of each other.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
}

impl RpcClient {
    /// Builds the mutual TLS client.
    ///
    /// The key may be PKCS#1 (`BEGIN RSA PRIVATE KEY`, as written by the
    /// node's own SSL setup) or PKCS#8. Fails if the certificate, key or CA
    /// cannot be read or parsed.
    pub fn new(tls: &TlsConfig, timeout: Duration) -> Result<Self> {
        let mut identity_pem = read_pem(&tls.cert)?;
        if !identity_pem.ends_with(b"\n") {
            identity_pem.push(b'\n');
        }
        identity_pem.extend(read_pem(&tls.key)?);
        let identity = reqwest::Identity::from_pem(&identity_pem)
            .map_err(|e| ExporterError::Tls(format!("failed to load key pair: {}", e)))?;

        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(100);

        if tls.verify_server {
            if let Some(ca) = &tls.ca_cert {
                let ca = reqwest::Certificate::from_pem(&read_pem(ca)?)
                    .map_err(|e| ExporterError::Tls(format!("failed to load CA: {}", e)))?;
                builder = builder.add_root_certificate(ca);
            }
        } else {
            // Node certificates are signed by a private per-install CA
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| ExporterError::Tls(e.to_string()))?;

        Ok(Self { http })
    }

    /// Wraps an already configured HTTP client.
    pub fn from_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Issues one RPC call and decodes the response into `T`.
    ///
    /// The whole body is read before decoding. Fields absent from the
    /// response take their schema defaults. Errors name the RPC path:
    /// transport failures and non-2xx statuses become
    /// [`ExporterError::Transport`], undecodable bodies
    /// [`ExporterError::Decode`], and a `"success": false` envelope
    /// [`ExporterError::Rejected`].
    pub async fn call<T>(&self, base: &Url, endpoint: &str, body: &Value) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", base.as_str().trim_end_matches('/'), endpoint);
        let transport = |source| ExporterError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };
        let decode = |source| ExporterError::Decode {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?;
        let bytes = response.bytes().await.map_err(transport)?;
        trace!("{} response: {}", endpoint, String::from_utf8_lossy(&bytes));

        let value: Value = serde_json::from_slice(&bytes).map_err(decode)?;
        let status = RpcStatus::deserialize(&value).map_err(decode)?;
        if !status.success {
            return Err(ExporterError::Rejected {
                endpoint: endpoint.to_string(),
                message: status.error,
            });
        }
        serde_json::from_value(value).map_err(decode)
    }

    // Full node

    pub async fn get_connections(&self, base: &Url) -> Result<Connections> {
        self.call(base, "get_connections", &empty_body()).await
    }

    pub async fn get_blockchain_state(&self, base: &Url) -> Result<BlockchainStateResponse> {
        self.call(base, "get_blockchain_state", &empty_body()).await
    }

    // Wallet

    pub async fn get_wallets(&self, base: &Url) -> Result<Wallets> {
        self.call(base, "get_wallets", &empty_body()).await
    }

    pub async fn get_public_keys(&self, base: &Url, wallet_id: u32) -> Result<PublicKeys> {
        self.call(base, "get_public_keys", &wallet_body(wallet_id))
            .await
    }

    pub async fn get_wallet_balance(
        &self,
        base: &Url,
        wallet_id: u32,
    ) -> Result<WalletBalanceResponse> {
        self.call(base, "get_wallet_balance", &wallet_body(wallet_id))
            .await
    }

    pub async fn get_sync_status(&self, base: &Url, wallet_id: u32) -> Result<WalletSyncStatus> {
        self.call(base, "get_sync_status", &wallet_body(wallet_id))
            .await
    }

    pub async fn get_height_info(&self, base: &Url, wallet_id: u32) -> Result<HeightInfo> {
        self.call(base, "get_height_info", &wallet_body(wallet_id))
            .await
    }

    pub async fn get_farmed_amount(&self, base: &Url, wallet_id: u32) -> Result<FarmedAmount> {
        self.call(base, "get_farmed_amount", &wallet_body(wallet_id))
            .await
    }

    // Farmer

    pub async fn get_pool_state(&self, base: &Url) -> Result<PoolStateResponse> {
        self.call(base, "get_pool_state", &empty_body()).await
    }

    pub async fn get_harvesters(&self, base: &Url) -> Result<Harvesters> {
        self.call(base, "get_harvesters", &empty_body()).await
    }

    // Harvester

    pub async fn get_plots(&self, base: &Url) -> Result<PlotFiles> {
        self.call(base, "get_plots", &empty_body()).await
    }
}

fn read_pem(path: &str) -> Result<Vec<u8>> {
    let path = expand_path(path).map_err(|e| ExporterError::Tls(format!("{:#}", e)))?;
    std::fs::read(&path).map_err(|e| {
        ExporterError::Tls(format!("failed to read {}: {}", path.display(), e))
    })
}
