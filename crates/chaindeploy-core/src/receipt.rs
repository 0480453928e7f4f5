//! Prepared transactions and confirmed receipts.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// A transaction ready for submission: target contract, calldata, value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedTransaction {
    /// Contract being called (the factory, or a system deployer contract).
    pub to: Address,
    /// ABI-encoded calldata, selector included.
    pub data: Bytes,
    /// Native value sent with the call.
    #[serde(default)]
    pub value: U256,
}

impl PreparedTransaction {
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            value: U256::ZERO,
        }
    }
}

/// A log emitted during execution, as it appears in a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Contract that emitted the log.
    pub address: Address,
    /// topics[0] is the event signature hash; the rest are indexed params.
    pub topics: Vec<B256>,
    /// ABI-encoded non-indexed params.
    pub data: Bytes,
    /// Position of the log within the block.
    #[serde(default)]
    pub log_index: u64,
}

impl LogEntry {
    /// The event signature hash (topics[0]), if present.
    pub fn signature(&self) -> Option<&B256> {
        self.topics.first()
    }
}

/// The outcome of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    /// `true` if execution succeeded (receipt status `0x1`).
    pub status: bool,
    /// Logs in emission order.
    pub logs: Vec<LogEntry>,
}

impl TransactionReceipt {
    /// Iterate over logs whose topics[0] equals `signature`, in receipt order.
    pub fn logs_with_signature<'a>(
        &'a self,
        signature: &'a B256,
    ) -> impl Iterator<Item = &'a LogEntry> + 'a {
        self.logs
            .iter()
            .filter(move |log| log.signature() == Some(signature))
    }
}
