//! Alternate deployment path for zkSync-family networks.
//!
//! Bytecode on these networks is deployed through the `ContractDeployer`
//! system contract by bytecode hash, so the factory's CREATE2 cloning is
//! unavailable. The proxy is instead created directly:
//!
//! - `create2(bytes32 salt, bytes32 bytecodeHash, bytes input)` when the
//!   caller supplied a salt
//! - `create(bytes32 salt, bytes32 bytecodeHash, bytes input)` otherwise
//!
//! `input` is the proxy constructor call `abi.encode(address logic, bytes data)`.
//! The new address is read from the system contract's `ContractDeployed` log
//! naming the sending account and the proxy bytecode hash.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{address, Address, Bytes, B256};
use async_trait::async_trait;
use chaindeploy_core::salt::{keccak256, salt_from_str};
use chaindeploy_core::{
    ChainClient, DeployError, DeployStage, DeployStrategy, PreparedTransaction, ResolvedDeployment,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::encoder::encode_logic_and_data;
use crate::events::contract_from_receipt;

/// The `ContractDeployer` system contract.
pub const CONTRACT_DEPLOYER_ADDRESS: Address = address!("0000000000000000000000000000000000008006");

pub const CREATE2_SIGNATURE: &str = "create2(bytes32,bytes32,bytes)";
pub const CREATE_SIGNATURE: &str = "create(bytes32,bytes32,bytes)";

/// Settings for the alternate path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkSyncConfig {
    /// Versioned bytecode hash of the proxy contract, as registered with the
    /// network's known-code storage.
    pub proxy_bytecode_hash: B256,
}

impl ZkSyncConfig {
    pub fn new(proxy_bytecode_hash: B256) -> Self {
        Self { proxy_bytecode_hash }
    }
}

fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a `ContractDeployer` call. `salt == None` selects `create`.
pub fn encode_deployer_call(salt: Option<B256>, bytecode_hash: B256, input: &[u8]) -> Bytes {
    let (signature, salt) = match salt {
        Some(s) => (CREATE2_SIGNATURE, s),
        None => (CREATE_SIGNATURE, B256::ZERO),
    };
    let params = DynSolValue::Tuple(vec![
        DynSolValue::FixedBytes(salt, 32),
        DynSolValue::FixedBytes(bytecode_hash, 32),
        DynSolValue::Bytes(input.to_vec()),
    ])
    .abi_encode_params();

    let mut calldata = selector(signature).to_vec();
    calldata.extend_from_slice(&params);
    calldata.into()
}

/// Predict the address `create2` will produce.
///
/// `keccak256(keccak256("zksyncCreate2") ++ pad32(sender) ++ salt ++ bytecodeHash ++ keccak256(input))[12..]`
pub fn create2_address(
    sender: Address,
    salt: B256,
    bytecode_hash: B256,
    input: &[u8],
) -> Address {
    let mut preimage = Vec::with_capacity(5 * 32);
    preimage.extend_from_slice(keccak256("zksyncCreate2").as_slice());
    preimage.extend_from_slice(sender.into_word().as_slice());
    preimage.extend_from_slice(salt.as_slice());
    preimage.extend_from_slice(bytecode_hash.as_slice());
    preimage.extend_from_slice(keccak256(input).as_slice());
    Address::from_word(keccak256(&preimage))
}

/// Deploys the proxy through the `ContractDeployer` system contract.
pub struct ZkSyncDeployer {
    client: Arc<dyn ChainClient>,
    config: ZkSyncConfig,
}

impl ZkSyncDeployer {
    pub fn new(client: Arc<dyn ChainClient>, config: ZkSyncConfig) -> Self {
        Self { client, config }
    }

    /// Build the system-contract call for `request`.
    pub fn prepare(
        &self,
        request: &ResolvedDeployment,
    ) -> Result<PreparedTransaction, DeployError> {
        if self.config.proxy_bytecode_hash == B256::ZERO {
            return Err(DeployError::configuration(format!(
                "no proxy bytecode hash configured for {}",
                request.chain
            )));
        }
        let input = encode_logic_and_data(request.implementation, &request.init_data);
        let salt = request.salt.as_deref().map(|s| salt_from_str(s).0);
        let data = encode_deployer_call(salt, self.config.proxy_bytecode_hash, &input);
        Ok(PreparedTransaction::new(CONTRACT_DEPLOYER_ADDRESS, data))
    }
}

#[async_trait]
impl DeployStrategy for ZkSyncDeployer {
    fn name(&self) -> &str {
        "zksync"
    }

    async fn deploy(&self, request: &ResolvedDeployment) -> Result<Address, DeployError> {
        let tx = self.prepare(request)?;
        tracing::info!(
            stage = %DeployStage::AltPath,
            chain_id = request.chain.id,
            implementation = %request.implementation,
            bytecode_hash = %self.config.proxy_bytecode_hash,
            create2 = request.salt.is_some(),
            "deploying proxy through ContractDeployer"
        );

        let receipt = self.client.submit_and_confirm(&tx, &request.account).await?;
        let proxy = contract_from_receipt(
            &receipt,
            CONTRACT_DEPLOYER_ADDRESS,
            request.account.address,
            self.config.proxy_bytecode_hash,
        )?;
        tracing::debug!(
            stage = %DeployStage::Decoded,
            tx_hash = %receipt.transaction_hash,
            proxy = %proxy,
            "ContractDeployed decoded"
        );
        Ok(proxy)
    }
}
