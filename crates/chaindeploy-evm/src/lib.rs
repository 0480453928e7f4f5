//! chaindeploy-evm: EVM encoding and deployment strategies for ChainDeploy.
//!
//! # Features
//! - `deployProxyByImplementation` calldata and salt-aware preparation
//! - `ProxyDeployed` / `ContractDeployed` log decoding
//! - Standard factory and zkSync `ContractDeployer` strategies
//! - Static chain classification and a fluent orchestrator builder
//! - `Error(string)` / `Panic(uint256)` revert decoding

pub mod builder;
pub mod classifier;
pub mod encoder;
pub mod events;
pub mod factory;
pub mod revert;
pub mod standard;
pub mod zksync;

#[cfg(test)]
mod testing;

pub use builder::DeployerBuilder;
pub use classifier::KnownChainClassifier;
pub use encoder::{encode_call, encode_call_str, init_call};
pub use events::{decode_proxy_deployed, proxy_from_receipt, ProxyDeployedEvent};
pub use factory::{prepare_deploy_transaction, PreparedDeploy};
pub use revert::decode_revert_reason;
pub use standard::StandardDeployer;
pub use zksync::{ZkSyncConfig, ZkSyncDeployer, CONTRACT_DEPLOYER_ADDRESS};
