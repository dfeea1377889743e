use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    /// Network, TLS handshake or non-2xx failure talking to an RPC endpoint.
    #[error("error calling {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error decoding {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The node answered but reported `success: false`.
    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: String, message: String },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("Endpoint URL does not start with https://, endpoint SSL is mandatory: {0}")]
    InsecureEndpoint(String),

    #[error("metric {name} emitted twice with labels {labels:?}")]
    DuplicateSample { name: String, labels: Vec<String> },

    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

impl ExporterError {
    /// RPC path the error originated from, if it came from an RPC call.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Rejected { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
