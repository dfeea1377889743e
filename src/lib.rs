//! Chia Prometheus Exporter
//!
//! A Prometheus metrics exporter for the Chia blockchain node services.
//!
//! # Overview
//!
//! On every scrape the exporter calls the HTTPS RPC servers of the full node,
//! wallet, farmer and harvester, and republishes selected fields as gauges.
//! Any of the four services can be disabled; a service that is down only
//! removes its own metrics from the scrape.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐                      ┌──────────────┐
//! │  full node  │ ◄──┐                 │   Exporter   │
//! ├─────────────┤    │  HTTPS + mTLS   │              │
//! │   wallet    │ ◄──┼───────────────► │  ┌────────┐  │      HTTP      ┌────────────┐
//! ├─────────────┤    │   JSON RPC      │  │ Client │  │ ◄────────────► │ Prometheus │
//! │   farmer    │ ◄──┤                 │  └────────┘  │   /metrics     └────────────┘
//! ├─────────────┤    │                 │  ┌─────────┐ │
//! │  harvester  │ ◄──┘                 │  │Collector│ │
//! └─────────────┘                      │  └─────────┘ │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`chia`] - RPC client, endpoint registry and response schemas
//! - [`collectors`] - Per-scrape orchestration and per-group transforms
//! - [`metrics`] - Metric descriptors, samples and rendering
//! - [`server`] - HTTP server
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use chia_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod chia;
pub mod collectors;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
