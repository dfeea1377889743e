use anyhow::Result;
use chia_exporter::{config::Config, server};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/Default.toml")]
    config: String,

    /// The address to listen on for HTTP requests (overrides config)
    #[arg(long, env = "CHIA_EXPORTER_LISTEN")]
    listen: Option<String>,

    /// The full node SSL certificate (overrides config)
    #[arg(long, env = "CHIA_EXPORTER_CERT")]
    cert: Option<String>,

    /// The full node SSL key (overrides config)
    #[arg(long, env = "CHIA_EXPORTER_KEY")]
    key: Option<String>,

    /// The base URL for the full node RPC endpoint; `--url` is the legacy name
    #[arg(
        long = "full_node",
        alias = "full-node",
        alias = "url",
        env = "CHIA_EXPORTER_FULL_NODE"
    )]
    full_node: Option<String>,

    /// The base URL for the wallet RPC endpoint
    #[arg(long, env = "CHIA_EXPORTER_WALLET")]
    wallet: Option<String>,

    /// The base URL for the farmer RPC endpoint
    #[arg(long, env = "CHIA_EXPORTER_FARMER")]
    farmer: Option<String>,

    /// The base URL for the harvester RPC endpoint
    #[arg(long, env = "CHIA_EXPORTER_HARVESTER")]
    harvester: Option<String>,

    /// HTTP client timeout per request, as duration string
    #[arg(long, env = "CHIA_EXPORTER_TIMEOUT")]
    timeout: Option<String>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(listen) = self.listen {
            config.server.listen = listen;
        }
        if let Some(cert) = self.cert {
            config.tls.cert = cert;
        }
        if let Some(key) = self.key {
            config.tls.key = key;
        }
        if let Some(url) = self.full_node {
            config.endpoints.full_node = url;
        }
        if let Some(url) = self.wallet {
            config.endpoints.wallet = url;
        }
        if let Some(url) = self.farmer {
            config.endpoints.farmer = url;
        }
        if let Some(url) = self.harvester {
            config.endpoints.harvester = url;
        }
        if let Some(timeout) = self.timeout {
            config.rpc.timeout = timeout;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("chia_exporter version {}", env!("CARGO_PKG_VERSION"));

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);

    info!("Configuration loaded successfully");

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
