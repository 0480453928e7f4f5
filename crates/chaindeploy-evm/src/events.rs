//! Deployment event decoding.
//!
//! Two events carry the address of a new proxy:
//!
//! - the factory's `ProxyDeployed(address indexed implementation, address proxy, address indexed deployer)`
//! - zkSync's `ContractDeployed(address indexed deployerAddress, bytes32 indexed bytecodeHash, address indexed contractAddress)`,
//!   emitted by the ContractDeployer system contract
//!
//! topics[0] is the keccak256 of the canonical signature; indexed address
//! params sit left-padded in topics[1..]; non-indexed params are the
//! ABI-encoded `data` tuple.

use alloy_core::dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{Address, B256};
use chaindeploy_core::salt::keccak256;
use chaindeploy_core::{DeployError, LogEntry, TransactionReceipt};
use serde::{Deserialize, Serialize};

pub const PROXY_DEPLOYED_SIGNATURE: &str = "ProxyDeployed(address,address,address)";
pub const CONTRACT_DEPLOYED_SIGNATURE: &str = "ContractDeployed(address,bytes32,address)";

/// keccak256 of an event signature: the value of topics[0].
pub fn event_signature_hash(signature: &str) -> B256 {
    keccak256(signature)
}

/// Decode an indexed address topic. Rejects words with dirty high bytes.
fn topic_address(topic: &B256) -> Option<Address> {
    if topic[..12].iter().any(|b| *b != 0) {
        return None;
    }
    Some(Address::from_word(*topic))
}

/// A decoded `ProxyDeployed` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyDeployedEvent {
    pub implementation: Address,
    pub proxy: Address,
    pub deployer: Address,
    /// Address of the factory that emitted the log.
    pub emitter: Address,
    pub log_index: u64,
}

/// Decode `log` as `ProxyDeployed`, or `None` if it does not match the schema.
pub fn decode_proxy_deployed(log: &LogEntry) -> Option<ProxyDeployedEvent> {
    if log.topics.len() != 3 || log.topics[0] != event_signature_hash(PROXY_DEPLOYED_SIGNATURE) {
        return None;
    }
    let implementation = topic_address(&log.topics[1])?;
    let deployer = topic_address(&log.topics[2])?;
    let proxy = match DynSolType::Address.abi_decode(&log.data) {
        Ok(DynSolValue::Address(a)) => a,
        _ => return None,
    };
    Some(ProxyDeployedEvent {
        implementation,
        proxy,
        deployer,
        emitter: log.address,
        log_index: log.log_index,
    })
}

/// Decode every `ProxyDeployed` log, in receipt order.
pub fn decode_proxy_deployed_logs(logs: &[LogEntry]) -> Vec<ProxyDeployedEvent> {
    logs.iter().filter_map(decode_proxy_deployed).collect()
}

/// The proxy address from the first `ProxyDeployed` log of `receipt`.
///
/// Later matches are ignored. No match is a [`DeployError::Protocol`]
/// carrying the transaction hash.
pub fn proxy_from_receipt(receipt: &TransactionReceipt) -> Result<Address, DeployError> {
    let signature = event_signature_hash(PROXY_DEPLOYED_SIGNATURE);
    let events: Vec<ProxyDeployedEvent> = receipt
        .logs_with_signature(&signature)
        .filter_map(decode_proxy_deployed)
        .collect();
    if events.len() > 1 {
        tracing::debug!(
            tx_hash = %receipt.transaction_hash,
            count = events.len(),
            "multiple ProxyDeployed events, using the first"
        );
    }
    events
        .first()
        .map(|e| e.proxy)
        .ok_or(DeployError::Protocol {
            event: "ProxyDeployed".into(),
            tx_hash: receipt.transaction_hash,
        })
}

/// A decoded zkSync `ContractDeployed` log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDeployedEvent {
    pub deployer: Address,
    pub bytecode_hash: B256,
    pub contract: Address,
    pub log_index: u64,
}

/// Decode `log` as `ContractDeployed`, or `None` if it does not match.
pub fn decode_contract_deployed(log: &LogEntry) -> Option<ContractDeployedEvent> {
    if log.topics.len() != 4
        || log.topics[0] != event_signature_hash(CONTRACT_DEPLOYED_SIGNATURE)
    {
        return None;
    }
    Some(ContractDeployedEvent {
        deployer: topic_address(&log.topics[1])?,
        bytecode_hash: log.topics[2],
        contract: topic_address(&log.topics[3])?,
        log_index: log.log_index,
    })
}

/// The contract `deployer` created from `bytecode_hash`, as logged by `emitter`.
///
/// `ContractDeployed` is emitted after the constructor returns, so contracts
/// created inside the constructor are logged first. They carry a different
/// deployer and are skipped.
pub fn contract_from_receipt(
    receipt: &TransactionReceipt,
    emitter: Address,
    deployer: Address,
    bytecode_hash: B256,
) -> Result<Address, DeployError> {
    let signature = event_signature_hash(CONTRACT_DEPLOYED_SIGNATURE);
    let result = receipt
        .logs_with_signature(&signature)
        .filter(|log| log.address == emitter)
        .filter_map(decode_contract_deployed)
        .find(|e| e.deployer == deployer && e.bytecode_hash == bytecode_hash)
        .map(|e| e.contract)
        .ok_or(DeployError::Protocol {
            event: "ContractDeployed".into(),
            tx_hash: receipt.transaction_hash,
        });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{contract_deployed_log, deployer, proxy_deployed_log, receipt};
    use chaindeploy_core::ErrorKind;
    use alloy_primitives::Bytes;

    #[test]
    fn proxy_deployed_topic_is_signature_hash() {
        let log = proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xab), 0);
        assert_eq!(log.topics[0], keccak256("ProxyDeployed(address,address,address)"));
    }

    #[test]
    fn single_event_yields_proxy() {
        let log = proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xab), 0);
        let decoded = decode_proxy_deployed(&log).unwrap();
        assert_eq!(decoded.implementation, Address::repeat_byte(0x11));
        assert_eq!(decoded.proxy, Address::repeat_byte(0xab));
        assert_eq!(
            proxy_from_receipt(&receipt(vec![log])).unwrap(),
            Address::repeat_byte(0xab)
        );
    }

    #[test]
    fn first_of_many_wins() {
        let r = receipt(vec![
            proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xa1), 0),
            proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xa2), 1),
        ]);
        assert_eq!(decode_proxy_deployed_logs(&r.logs).len(), 2);
        assert_eq!(proxy_from_receipt(&r).unwrap(), Address::repeat_byte(0xa1));
    }

    #[test]
    fn unrelated_logs_are_skipped() {
        let transfer = LogEntry {
            address: Address::repeat_byte(0x77),
            topics: vec![
                keccak256("Transfer(address,address,uint256)"),
                B256::ZERO,
                B256::ZERO,
            ],
            data: Bytes::from(vec![0u8; 32]),
            log_index: 0,
        };
        let r = receipt(vec![
            transfer,
            proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xa2), 1),
        ]);
        assert_eq!(proxy_from_receipt(&r).unwrap(), Address::repeat_byte(0xa2));
    }

    #[test]
    fn no_event_is_protocol_error_with_hash() {
        let r = receipt(vec![]);
        let err = proxy_from_receipt(&r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
        assert_eq!(err.tx_hash(), Some(r.transaction_hash));
    }

    #[test]
    fn truncated_data_does_not_match() {
        let mut log = proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xab), 0);
        log.data = Bytes::from(vec![0u8; 16]);
        assert!(decode_proxy_deployed(&log).is_none());
    }

    #[test]
    fn dirty_topic_does_not_match() {
        let mut log = proxy_deployed_log(Address::repeat_byte(0x11), Address::repeat_byte(0xab), 0);
        log.topics[1] = B256::repeat_byte(0xff);
        assert!(decode_proxy_deployed(&log).is_none());
    }

    #[test]
    fn contract_deployed_filters_by_emitter() {
        let system = Address::with_last_byte(0x06);
        let hash = B256::repeat_byte(0xbc);
        let mut foreign =
            contract_deployed_log(system, deployer(), hash, Address::repeat_byte(0xc1), 0);
        foreign.address = Address::repeat_byte(0x99);
        let r = receipt(vec![
            foreign,
            contract_deployed_log(system, deployer(), hash, Address::repeat_byte(0xc2), 1),
        ]);
        assert_eq!(
            contract_from_receipt(&r, system, deployer(), hash).unwrap(),
            Address::repeat_byte(0xc2)
        );

        let err = contract_from_receipt(&receipt(vec![]), system, deployer(), hash).unwrap_err();
        assert!(err.to_string().contains("ContractDeployed"));
    }

    #[test]
    fn contract_deployed_skips_constructor_children() {
        let system = Address::with_last_byte(0x06);
        let proxy = Address::repeat_byte(0xc2);
        let hash = B256::repeat_byte(0xbc);
        // the child is logged first, before the proxy constructor returns
        let child = Address::repeat_byte(0xcc);
        let r = receipt(vec![
            contract_deployed_log(system, proxy, B256::repeat_byte(0x0d), child, 0),
            contract_deployed_log(system, deployer(), hash, proxy, 1),
        ]);
        assert_eq!(contract_from_receipt(&r, system, deployer(), hash).unwrap(), proxy);

        let err = contract_from_receipt(&r, system, Address::repeat_byte(0x02), hash).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }
}
