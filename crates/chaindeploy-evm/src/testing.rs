//! Test doubles shared by the unit tests of this crate.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use chaindeploy_core::{
    Account, ChainClient, DeployError, LogEntry, PreparedTransaction, TransactionReceipt,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::events::{event_signature_hash, CONTRACT_DEPLOYED_SIGNATURE, PROXY_DEPLOYED_SIGNATURE};

pub fn deployer() -> Address {
    Address::repeat_byte(0x01)
}

pub fn tx_hash() -> B256 {
    B256::repeat_byte(0xee)
}

pub fn proxy_deployed_log(implementation: Address, proxy: Address, log_index: u64) -> LogEntry {
    LogEntry {
        address: Address::repeat_byte(0xfa),
        topics: vec![
            event_signature_hash(PROXY_DEPLOYED_SIGNATURE),
            implementation.into_word(),
            deployer().into_word(),
        ],
        data: Bytes::copy_from_slice(proxy.into_word().as_slice()),
        log_index,
    }
}

pub fn contract_deployed_log(
    emitter: Address,
    deployer: Address,
    bytecode_hash: B256,
    contract: Address,
    log_index: u64,
) -> LogEntry {
    LogEntry {
        address: emitter,
        topics: vec![
            event_signature_hash(CONTRACT_DEPLOYED_SIGNATURE),
            deployer.into_word(),
            bytecode_hash,
            contract.into_word(),
        ],
        data: Bytes::new(),
        log_index,
    }
}

pub fn receipt(logs: Vec<LogEntry>) -> TransactionReceipt {
    TransactionReceipt {
        transaction_hash: tx_hash(),
        block_number: 100,
        status: true,
        logs,
    }
}

/// In-memory `ChainClient` that records what it was asked to do.
pub struct MockClient {
    block: u64,
    outcome: Mutex<Option<Result<TransactionReceipt, DeployError>>>,
    block_error: Mutex<Option<DeployError>>,
    block_calls: AtomicU32,
    pub submitted: Mutex<Vec<PreparedTransaction>>,
}

impl MockClient {
    pub fn new(block: u64) -> Self {
        Self {
            block,
            outcome: Mutex::new(None),
            block_error: Mutex::new(None),
            block_calls: AtomicU32::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_logs(self, logs: Vec<LogEntry>) -> Self {
        *self.outcome.lock().unwrap() = Some(Ok(receipt(logs)));
        self
    }

    pub fn with_error(self, err: DeployError) -> Self {
        *self.outcome.lock().unwrap() = Some(Err(err));
        self
    }

    /// Fail the next block-height lookup with `err`.
    pub fn with_block_error(self, err: DeployError) -> Self {
        *self.block_error.lock().unwrap() = Some(err);
        self
    }

    pub fn block_number_calls(&self) -> u32 {
        self.block_calls.load(Ordering::Relaxed)
    }

    pub fn submit_calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainClient for MockClient {
    async fn block_number(&self) -> Result<u64, DeployError> {
        self.block_calls.fetch_add(1, Ordering::Relaxed);
        match self.block_error.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(self.block),
        }
    }

    async fn submit_and_confirm(
        &self,
        tx: &PreparedTransaction,
        _account: &Account,
    ) -> Result<TransactionReceipt, DeployError> {
        self.submitted.lock().unwrap().push(tx.clone());
        self.outcome
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(DeployError::network("no outcome configured")))
    }
}
