//! Exporter configuration
//!
//! Settings are layered: an optional TOML file, then `CHIA_EXPORTER__*`
//! environment variables, then command line flags (applied in `main`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

/// Client certificate used for every RPC call.
#[derive(Debug, Deserialize, Clone)]
pub struct TlsConfig {
    #[serde(default = "default_cert")]
    pub cert: String,
    #[serde(default = "default_key")]
    pub key: String,
    /// Chia nodes serve certificates signed by a per-install private CA, so
    /// server verification is off unless asked for.
    #[serde(default)]
    pub verify_server: bool,
    #[serde(default)]
    pub ca_cert: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointsConfig {
    #[serde(default = "default_full_node")]
    pub full_node: String,
    #[serde(default = "default_wallet")]
    pub wallet: String,
    #[serde(default = "default_farmer")]
    pub farmer: String,
    #[serde(default = "default_harvester")]
    pub harvester: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RpcConfig {
    /// Whole round trip timeout, as a duration string such as `5s` or `1m30s`.
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

fn default_listen() -> String {
    "0.0.0.0:9133".to_string()
}

fn default_cert() -> String {
    "$HOME/.chia/mainnet/config/ssl/full_node/private_full_node.crt".to_string()
}

fn default_key() -> String {
    "$HOME/.chia/mainnet/config/ssl/full_node/private_full_node.key".to_string()
}

fn default_full_node() -> String {
    "https://localhost:8555".to_string()
}

fn default_wallet() -> String {
    "https://localhost:9256".to_string()
}

fn default_farmer() -> String {
    "https://localhost:8559".to_string()
}

fn default_harvester() -> String {
    "https://localhost:8560".to_string()
}

fn default_timeout() -> String {
    "5s".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert: default_cert(),
            key: default_key(),
            verify_server: false,
            ca_cert: None,
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            full_node: default_full_node(),
            wallet: default_wallet(),
            farmer: default_farmer(),
            harvester: default_harvester(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CHIA_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl ServerConfig {
    /// Socket address to bind. A bare `:port` listens on all interfaces.
    pub fn bind_addr(&self) -> String {
        match self.listen.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port),
            None => self.listen.clone(),
        }
    }
}

impl RpcConfig {
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout)
    }
}

/// Expands `~` and `$VAR` / `${VAR}` in a configured path.
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded =
        shellexpand::full(raw).with_context(|| format!("Failed to expand path {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Parses a duration string made of number/unit pairs (`300ms`, `5s`, `1m30s`, `1.5h`).
///
/// Accepted units are `ns`, `us`, `µs`, `ms`, `s`, `m` and `h`. A bare `0`
/// is allowed; any other number must carry a unit.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let input = raw.trim();
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    if input.is_empty() {
        anyhow::bail!("invalid duration \"{}\"", raw);
    }

    let mut total_nanos = 0f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            anyhow::bail!("invalid duration \"{}\"", raw);
        }
        let value: f64 = rest[..number_len]
            .parse()
            .with_context(|| format!("invalid duration \"{}\"", raw))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => anyhow::bail!("missing unit in duration \"{}\"", raw),
            unit => anyhow::bail!("unknown unit \"{}\" in duration \"{}\"", unit, raw),
        };
        rest = &rest[unit_len..];
        total_nanos += value * nanos_per_unit;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        anyhow::bail!("duration \"{}\" out of range", raw);
    }
    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
