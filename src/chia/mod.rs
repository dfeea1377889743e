pub mod client;
pub mod endpoint;
pub mod types;

pub use client::RpcClient;
pub use endpoint::{Endpoint, EndpointRegistry, Subsystem};
