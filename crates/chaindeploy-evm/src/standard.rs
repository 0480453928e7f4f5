//! Standard deployment path: salt, factory call, confirmation, event decode.

use alloy_primitives::Address;
use async_trait::async_trait;
use chaindeploy_core::{ChainClient, DeployError, DeployStage, DeployStrategy, ResolvedDeployment};
use std::sync::Arc;

use crate::events::proxy_from_receipt;
use crate::factory::prepare_resolved;

/// Deploys through the factory's `deployProxyByImplementation` and reads the
/// proxy address from the `ProxyDeployed` event.
pub struct StandardDeployer {
    client: Arc<dyn ChainClient>,
}

impl StandardDeployer {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeployStrategy for StandardDeployer {
    fn name(&self) -> &str {
        "standard"
    }

    async fn deploy(&self, request: &ResolvedDeployment) -> Result<Address, DeployError> {
        tracing::debug!(
            stage = %DeployStage::SaltPending,
            chain_id = request.chain.id,
            explicit_salt = request.salt.is_some(),
            "resolving salt"
        );
        let prepared = prepare_resolved(self.client.as_ref(), request).await?;

        tracing::info!(
            stage = %DeployStage::StdPrepared,
            chain_id = request.chain.id,
            factory = %request.factory,
            implementation = %prepared.implementation,
            init_data_len = prepared.init_data.len(),
            salt = %prepared.salt,
            salt_source = %prepared.salt_source,
            "prepared factory call"
        );

        tracing::debug!(stage = %DeployStage::Submitted, chain_id = request.chain.id, "submitting");
        let receipt = self
            .client
            .submit_and_confirm(&prepared.tx, &request.account)
            .await?;
        tracing::debug!(
            stage = %DeployStage::Confirmed,
            tx_hash = %receipt.transaction_hash,
            block = receipt.block_number,
            logs = receipt.logs.len(),
            "transaction confirmed"
        );

        let proxy = proxy_from_receipt(&receipt)?;
        tracing::debug!(
            stage = %DeployStage::Decoded,
            tx_hash = %receipt.transaction_hash,
            proxy = %proxy,
            "ProxyDeployed decoded"
        );
        Ok(proxy)
    }
}
