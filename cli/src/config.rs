//! `deploy.json`: everything `chaindeploy deploy` needs besides the call
//! itself. Command-line flags override file values.
//!
//! ```json
//! {
//!   "rpc_url": "https://mainnet.era.zksync.io",
//!   "chain_id": 324,
//!   "chain_name": "zksync-era",
//!   "from": "0x...",
//!   "factory": "0x...",
//!   "zksync": { "proxy_bytecode_hash": "0x0100..." },
//!   "confirmation": { "poll_interval_ms": 1000, "timeout_ms": 120000, "confirmations": 1 },
//!   "log": { "level": "info", "json": false }
//! }
//! ```

use alloy_primitives::Address;
use anyhow::{Context, Result};
use chaindeploy_evm::ZkSyncConfig;
use chaindeploy_rpc::{ConfirmationConfig, HttpClientConfig, RetryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::logging::LogConfig;

pub const RPC_URL_ENV: &str = "CHAINDEPLOY_RPC_URL";
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub rpc_url: Option<String>,
    pub chain_id: Option<u64>,
    pub chain_name: Option<String>,
    /// Override the execution-model classification for this chain.
    pub alternate: Option<bool>,
    pub from: Option<Address>,
    pub factory: Option<Address>,
    pub zksync: ZkSyncConfig,
    pub confirmation: ConfirmationConfig,
    /// Retries for idempotent RPC reads.
    pub max_retries: u32,
    pub request_timeout_ms: u64,
    pub log: LogConfig,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            chain_id: None,
            chain_name: None,
            alternate: None,
            from: None,
            factory: None,
            zksync: ZkSyncConfig::default(),
            confirmation: ConfirmationConfig::default(),
            max_retries: 3,
            request_timeout_ms: 30_000,
            log: LogConfig::default(),
        }
    }
}

impl DeployConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse config '{}'", path.display()))
    }

    /// `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Flag, then file, then `CHAINDEPLOY_RPC_URL`, then localhost.
    pub fn rpc_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.rpc_url.clone())
            .or_else(|| std::env::var(RPC_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_RPC_URL.to_string())
    }

    pub fn http(&self) -> HttpClientConfig {
        HttpClientConfig {
            retry: RetryConfig {
                max_retries: self.max_retries,
                ..RetryConfig::default()
            },
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}
