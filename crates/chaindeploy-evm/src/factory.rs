//! Factory call preparation for the standard deployment path.
//!
//! The factory exposes
//! `deployProxyByImplementation(address _implementation, bytes _data, bytes32 _salt)`,
//! which clones `_implementation` at a CREATE2 address derived from `_salt`
//! and calls the clone with `_data`.

use alloy_core::dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, B256};
use chaindeploy_core::salt::{self, SaltSource};
use chaindeploy_core::{
    ChainClient, DeployError, InitializationTransaction, PreparedTransaction, ResolvedDeployment,
};
use serde::{Deserialize, Serialize};

/// Canonical signature of the factory entry point.
pub const DEPLOY_PROXY_BY_IMPLEMENTATION: &str =
    "deployProxyByImplementation(address,bytes,bytes32)";

/// 4-byte selector of [`DEPLOY_PROXY_BY_IMPLEMENTATION`].
pub fn deploy_proxy_selector() -> [u8; 4] {
    let hash = salt::keccak256(DEPLOY_PROXY_BY_IMPLEMENTATION);
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode the factory calldata.
pub fn encode_deploy_proxy(implementation: Address, data: &[u8], salt: B256) -> Bytes {
    let params = DynSolValue::Tuple(vec![
        DynSolValue::Address(implementation),
        DynSolValue::Bytes(data.to_vec()),
        DynSolValue::FixedBytes(salt, 32),
    ])
    .abi_encode_params();

    let mut calldata = deploy_proxy_selector().to_vec();
    calldata.extend_from_slice(&params);
    calldata.into()
}

/// A factory call ready to submit, with the parameters that went into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedDeploy {
    pub tx: PreparedTransaction,
    pub implementation: Address,
    pub init_data: Bytes,
    pub salt: B256,
    pub salt_source: SaltSource,
}

/// Resolve the salt for `raw`, reading the block height only when no salt
/// string was supplied.
pub async fn resolve_salt(
    client: &dyn ChainClient,
    raw: Option<&str>,
) -> Result<(B256, SaltSource), DeployError> {
    match raw {
        Some(s) => Ok(salt::salt_from_str(s)),
        None => {
            let height = client.block_number().await?;
            Ok(salt::resolve_salt(None, height))
        }
    }
}

/// Build the factory call for an already-resolved request.
pub async fn prepare_resolved(
    client: &dyn ChainClient,
    request: &ResolvedDeployment,
) -> Result<PreparedDeploy, DeployError> {
    let (salt, salt_source) = resolve_salt(client, request.salt.as_deref()).await?;
    let data = encode_deploy_proxy(request.implementation, &request.init_data, salt);
    Ok(PreparedDeploy {
        tx: PreparedTransaction::new(request.factory, data),
        implementation: request.implementation,
        init_data: request.init_data.clone(),
        salt,
        salt_source,
    })
}

/// Prepare (without sending) the factory call for an initialization
/// transaction.
///
/// The target is resolved first: a request without an implementation fails
/// with [`DeployError::Configuration`] before the block-height lookup.
pub async fn prepare_deploy_transaction(
    client: &dyn ChainClient,
    factory: Address,
    init: InitializationTransaction,
    salt: Option<&str>,
) -> Result<PreparedDeploy, DeployError> {
    let init_data = init.encode();
    let implementation = init.target.resolve().await?;
    let (salt, salt_source) = resolve_salt(client, salt.filter(|s| !s.is_empty())).await?;
    let data = encode_deploy_proxy(implementation, &init_data, salt);
    Ok(PreparedDeploy {
        tx: PreparedTransaction::new(factory, data),
        implementation,
        init_data,
        salt,
        salt_source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockClient;
    use chaindeploy_core::{DeployTarget, ErrorKind};

    #[test]
    fn calldata_layout() {
        let salt = B256::repeat_byte(0x5a);
        let data = encode_deploy_proxy(Address::repeat_byte(0x11), &[0x81, 0x29], salt);
        assert_eq!(&data[..4], &deploy_proxy_selector());
        let params = &data[4..];
        // implementation, offset, salt, length, one padded data word
        assert_eq!(params.len(), 5 * 32);
        assert_eq!(&params[12..32], Address::repeat_byte(0x11).as_slice());
        assert_eq!(params[63], 0x60);
        assert_eq!(&params[64..96], salt.as_slice());
        assert_eq!(params[127], 2);
        assert_eq!(&params[128..130], &[0x81, 0x29]);
    }

    #[tokio::test]
    async fn explicit_salt_skips_block_lookup() {
        let client = MockClient::new(1234);
        let init = InitializationTransaction::new(Address::repeat_byte(0x11), vec![0x01]);
        let prepared =
            prepare_deploy_transaction(&client, Address::repeat_byte(0xfa), init, Some("x"))
                .await
                .unwrap();
        assert_eq!(prepared.salt_source, SaltSource::Hashed);
        assert_eq!(prepared.salt, salt::keccak256("x"));
        assert_eq!(prepared.tx.to, Address::repeat_byte(0xfa));
        assert_eq!(client.block_number_calls(), 0);
    }

    #[tokio::test]
    async fn missing_salt_uses_block_height() {
        let client = MockClient::new(1234);
        let init = InitializationTransaction::new(Address::repeat_byte(0x11), vec![0x01]);
        let prepared = prepare_deploy_transaction(&client, Address::repeat_byte(0xfa), init, None)
            .await
            .unwrap();
        assert_eq!(prepared.salt_source, SaltSource::BlockHeight);
        assert_eq!(prepared.salt, salt::block_height_salt(1234));
        assert_eq!(client.block_number_calls(), 1);
    }

    #[tokio::test]
    async fn missing_target_fails_before_block_lookup() {
        let client = MockClient::new(1234);
        let init = InitializationTransaction::new(DeployTarget::none(), vec![0x01]);
        let err = prepare_deploy_transaction(&client, Address::repeat_byte(0xfa), init, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(client.block_number_calls(), 0);
    }
}
