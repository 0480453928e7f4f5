//! Collaborator traits the pipeline calls into.
//!
//! The core owns no transport: network access goes through [`ChainClient`]
//! and [`ChainClassifier`], and the two deployment protocols are
//! [`DeployStrategy`] implementations selected once per request.

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::chain::Chain;
use crate::error::DeployError;
use crate::receipt::{PreparedTransaction, TransactionReceipt};
use crate::request::{Account, ResolvedDeployment};

/// Network access needed by the deployment pipeline.
///
/// Implementations must be `Send + Sync`; one client may be shared by any
/// number of concurrent deployments.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current block height of the target network.
    async fn block_number(&self) -> Result<u64, DeployError>;

    /// Broadcast `tx` from `account` and wait until it is included and
    /// confirmed.
    ///
    /// Returns [`DeployError::Chain`] if execution reverted and
    /// [`DeployError::Network`] on transport failure. Confirmation timeouts
    /// are the implementation's policy.
    async fn submit_and_confirm(
        &self,
        tx: &PreparedTransaction,
        account: &Account,
    ) -> Result<TransactionReceipt, DeployError>;
}

/// Decides whether a network needs the alternate deployment protocol.
///
/// A probe failure must surface as [`DeployError::Network`]; implementations
/// never fall back to either answer.
#[async_trait]
pub trait ChainClassifier: Send + Sync {
    async fn uses_alternate_model(&self, chain: &Chain) -> Result<bool, DeployError>;
}

/// One deployment protocol: turns a resolved request into a proxy address.
#[async_trait]
pub trait DeployStrategy: Send + Sync {
    /// Short name used in logs ("standard", "zksync").
    fn name(&self) -> &str;

    async fn deploy(&self, request: &ResolvedDeployment) -> Result<Address, DeployError>;
}
