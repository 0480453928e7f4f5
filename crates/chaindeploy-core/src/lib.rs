//! chaindeploy-core: types, salt derivation and orchestration for
//! deterministic proxy deployment.
//!
//! # Overview
//!
//! A deployment takes a factory contract and an initialization transaction,
//! picks the deployment protocol the target network needs, and returns the
//! address of the new proxy. The core crate defines:
//!
//! - [`DeploymentOrchestrator`]: the public `deploy` operation
//! - [`salt`]: deterministic 32-byte salt derivation
//! - [`ChainClient`] / [`ChainClassifier`] / [`DeployStrategy`]: collaborator seams
//! - [`DeployError`]: the failure taxonomy
//!
//! EVM encoding and the concrete strategies live in `chaindeploy-evm`; the
//! JSON-RPC client lives in `chaindeploy-rpc`.

pub mod chain;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod receipt;
pub mod request;
pub mod salt;

pub use chain::Chain;
pub use client::{ChainClassifier, ChainClient, DeployStrategy};
pub use error::{DeployError, ErrorKind};
pub use orchestrator::{DeployStage, DeploymentOrchestrator};
pub use receipt::{LogEntry, PreparedTransaction, TransactionReceipt};
pub use request::{
    Account, DeployTarget, DeploymentRequest, InitializationTransaction, ResolvedDeployment,
};
pub use salt::SaltSource;
