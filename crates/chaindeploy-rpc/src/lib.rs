//! chaindeploy-rpc: JSON-RPC chain client and network classifier.
//!
//! # Features
//! - [`RpcChainClient`]: block height, `eth_sendTransaction` broadcast,
//!   receipt polling with confirmation depth and timeout, revert replay
//! - [`RpcChainClassifier`]: static chain list plus a cached
//!   `zks_L1ChainId` probe
//! - [`HttpTransport`]: reqwest transport retrying idempotent reads with
//!   exponential backoff
//!
//! # Example
//! ```ignore
//! let client = Arc::new(RpcChainClient::http(url, HttpClientConfig::default(), ConfirmationConfig::default())?);
//! let orchestrator = DeployerBuilder::new(client.clone())
//!     .classifier(Arc::new(RpcChainClassifier::new(client)))
//!     .build();
//! ```

pub mod classifier;
pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod retry;
pub mod transport;
pub mod wire;

#[cfg(test)]
mod testing;

pub use classifier::RpcChainClassifier;
pub use client::{ConfirmationConfig, RpcChainClient};
pub use error::TransportError;
pub use http::{HttpClientConfig, HttpTransport};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::RpcTransport;
