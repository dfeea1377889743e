//! RPC endpoint registry
//!
//! The four node subsystems each expose their own RPC server. Any of them can
//! be disabled, in which case its metric group is skipped on every scrape.

use crate::config::EndpointsConfig;
use crate::error::{ExporterError, Result};
use std::fmt;
use tracing::warn;
use url::Url;

/// Literal accepted in place of a URL to turn a subsystem off.
pub const DISABLED: &str = "disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    FullNode,
    Wallet,
    Farmer,
    Harvester,
}

impl Subsystem {
    pub fn name(self) -> &'static str {
        match self {
            Subsystem::FullNode => "full_node",
            Subsystem::Wallet => "wallet",
            Subsystem::Farmer => "farmer",
            Subsystem::Harvester => "harvester",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base URL of one subsystem's RPC server, or nothing when disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Enabled(Url),
    Disabled,
}

impl Endpoint {
    /// Validates a configured base URL.
    ///
    /// The sentinel, an unparseable URL and a URL that cannot act as a base
    /// all disable the endpoint. A parseable URL with any scheme other than
    /// `https` is an error, since the RPC servers only speak mutual TLS.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == DISABLED {
            return Ok(Endpoint::Disabled);
        }
        let url = match Url::parse(raw) {
            Ok(url) if !url.cannot_be_a_base() => url,
            Ok(_) => {
                warn!("Disabling invalid endpoint {:?}: not an absolute URL", raw);
                return Ok(Endpoint::Disabled);
            }
            Err(e) => {
                warn!("Disabling invalid endpoint {:?}: {}", raw, e);
                return Ok(Endpoint::Disabled);
            }
        };
        if url.scheme() != "https" {
            return Err(ExporterError::InsecureEndpoint(raw.to_string()));
        }
        Ok(Endpoint::Enabled(url))
    }

    pub fn base_url(&self) -> Option<&Url> {
        match self {
            Endpoint::Enabled(url) => Some(url),
            Endpoint::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Endpoint::Enabled(_))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Enabled(url) => write!(f, "{}", url),
            Endpoint::Disabled => f.write_str(DISABLED),
        }
    }
}

/// Resolved endpoints for all four subsystems. Read-only after startup.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    pub full_node: Endpoint,
    pub wallet: Endpoint,
    pub farmer: Endpoint,
    pub harvester: Endpoint,
}

impl EndpointRegistry {
    pub fn from_config(config: &EndpointsConfig) -> Result<Self> {
        Ok(Self {
            full_node: Endpoint::parse(&config.full_node)?,
            wallet: Endpoint::parse(&config.wallet)?,
            farmer: Endpoint::parse(&config.farmer)?,
            harvester: Endpoint::parse(&config.harvester)?,
        })
    }

    /// Registry with every subsystem disabled.
    pub fn disabled() -> Self {
        Self {
            full_node: Endpoint::Disabled,
            wallet: Endpoint::Disabled,
            farmer: Endpoint::Disabled,
            harvester: Endpoint::Disabled,
        }
    }

    pub fn get(&self, subsystem: Subsystem) -> &Endpoint {
        match subsystem {
            Subsystem::FullNode => &self.full_node,
            Subsystem::Wallet => &self.wallet,
            Subsystem::Farmer => &self.farmer,
            Subsystem::Harvester => &self.harvester,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subsystem, &Endpoint)> {
        [
            Subsystem::FullNode,
            Subsystem::Wallet,
            Subsystem::Farmer,
            Subsystem::Harvester,
        ]
        .into_iter()
        .map(move |s| (s, self.get(s)))
    }
}
