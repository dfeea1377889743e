//! Chia RPC Response Schemas
//!
//! Each struct captures only the fields the exporter reads from one RPC call.
//! Every field is either required (decoding fails without it) or carries
//! `#[serde(default)]`, in which case a missing or `null` value decodes to the
//! field's zero value. Unknown fields are ignored.
//!
//! # RPC Calls Covered
//!
//! - full node `get_connections` → [`Connections`]
//! - full node `get_blockchain_state` → [`BlockchainStateResponse`]
//! - wallet `get_wallets` → [`Wallets`]
//! - wallet `get_public_keys` → [`PublicKeys`]
//! - wallet `get_wallet_balance` → [`WalletBalanceResponse`]
//! - wallet `get_sync_status` → [`WalletSyncStatus`]
//! - wallet `get_height_info` → [`HeightInfo`]
//! - wallet `get_farmed_amount` → [`FarmedAmount`]
//! - farmer `get_pool_state` → [`PoolStateResponse`]
//! - farmer `get_harvesters` → [`Harvesters`]
//! - harvester `get_plots` → [`PlotFiles`]

use serde::{Deserialize, Deserializer};

/// Decodes `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope fields every Chia RPC response carries.
#[derive(Debug, Deserialize, Default)]
pub struct RpcStatus {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
}

fn default_success() -> bool {
    true
}

/// Peer node types as numbered by the Chia protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    FullNode = 1,
    Harvester = 2,
    Farmer = 3,
    Timelord = 4,
    Introducer = 5,
    Wallet = 6,
    DataLayer = 7,
}

impl NodeType {
    pub const COUNT: usize = 7;

    /// Every known type, ordered by code.
    pub const ALL: [NodeType; NodeType::COUNT] = [
        NodeType::FullNode,
        NodeType::Harvester,
        NodeType::Farmer,
        NodeType::Timelord,
        NodeType::Introducer,
        NodeType::Wallet,
        NodeType::DataLayer,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

// get_connections

#[derive(Debug, Deserialize, Default)]
pub struct Connections {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Connection {
    #[serde(rename = "type")]
    pub node_type: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub peer_host: String,
}

// get_blockchain_state

#[derive(Debug, Deserialize, Default)]
pub struct BlockchainStateResponse {
    pub blockchain_state: BlockchainState,
}

#[derive(Debug, Deserialize, Default)]
pub struct BlockchainState {
    /// `null` until the node has seen the genesis block.
    #[serde(default, deserialize_with = "null_as_default")]
    pub peak: Peak,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: u64,
    /// Netspace in bytes; can exceed `u64` so it is read as a float.
    #[serde(default, deserialize_with = "null_as_default")]
    pub space: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sync: SyncState,
}

#[derive(Debug, Deserialize, Default)]
pub struct Peak {
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub total_iters: u64,
}

#[derive(Debug, Deserialize, Default)]
pub struct SyncState {
    #[serde(default)]
    pub sync_mode: bool,
    #[serde(default)]
    pub synced: bool,
}

// get_wallets

#[derive(Debug, Deserialize, Default)]
pub struct Wallets {
    #[serde(default, deserialize_with = "null_as_default")]
    pub wallets: Vec<Wallet>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Wallet {
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

// get_public_keys

#[derive(Debug, Deserialize, Default)]
pub struct PublicKeys {
    #[serde(default, deserialize_with = "null_as_default")]
    pub public_key_fingerprints: Vec<u64>,
}

// get_wallet_balance

#[derive(Debug, Deserialize, Default)]
pub struct WalletBalanceResponse {
    pub wallet_balance: WalletBalance,
}

/// Amounts are in mojo.
#[derive(Debug, Deserialize, Default)]
pub struct WalletBalance {
    #[serde(default, rename = "confirmed_wallet_balance")]
    pub confirmed: u64,
    #[serde(default, rename = "unconfirmed_wallet_balance")]
    pub unconfirmed: u64,
    #[serde(default, rename = "spendable_balance")]
    pub spendable: u64,
    #[serde(default)]
    pub max_send_amount: u64,
    #[serde(default)]
    pub pending_change: u64,
}

// get_sync_status

#[derive(Debug, Deserialize, Default)]
pub struct WalletSyncStatus {
    #[serde(default)]
    pub syncing: bool,
    #[serde(default)]
    pub synced: bool,
}

// get_height_info

#[derive(Debug, Deserialize, Default)]
pub struct HeightInfo {
    #[serde(default)]
    pub height: u64,
}

// get_farmed_amount

#[derive(Debug, Deserialize, Default)]
pub struct FarmedAmount {
    #[serde(default)]
    pub farmed_amount: u64,
    #[serde(default, alias = "farmer_reward_amount")]
    pub reward_amount: u64,
    #[serde(default)]
    pub fee_amount: u64,
    #[serde(default)]
    pub last_height_farmed: u64,
    #[serde(default)]
    pub pool_reward_amount: u64,
}

// get_pool_state

#[derive(Debug, Deserialize, Default)]
pub struct PoolStateResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pool_state: Vec<PoolState>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoolState {
    pub pool_config: PoolConfig,
    /// `null` while the pool has not been reached yet.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_difficulty: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_points: u64,
    /// `[timestamp, points]` pairs; only the number of entries is used.
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_acknowledged_24h: Vec<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_found_24h: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PoolConfig {
    pub launcher_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pool_url: String,
}

// get_plots

#[derive(Debug, Deserialize, Default)]
pub struct PlotFiles {
    #[serde(default, deserialize_with = "null_as_default")]
    pub plots: Vec<PlotEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_to_open_filenames: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub not_found_filenames: Vec<String>,
}

// get_harvesters

#[derive(Debug, Deserialize, Default)]
pub struct Harvesters {
    #[serde(default, deserialize_with = "null_as_default")]
    pub harvesters: Vec<Harvester>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Harvester {
    pub connection: HarvesterConnection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plots: Vec<PlotEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed_to_open_filenames: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub no_key_filenames: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HarvesterConnection {
    pub node_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub host: String,
}

impl HarvesterConnection {
    /// Node ID shortened to its first 12 characters for labels.
    pub fn short_node_id(&self) -> &str {
        match self.node_id.char_indices().nth(12) {
            Some((idx, _)) => &self.node_id[..idx],
            None => &self.node_id,
        }
    }
}

/// One plot file. Solo plots have no pool contract and portable plots no
/// pool public key; both decode to an empty string.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PlotEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub pool_public_key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pool_contract_puzzle_hash: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u8,
}
