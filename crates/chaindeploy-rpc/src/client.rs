//! `ChainClient` over JSON-RPC.
//!
//! Submission uses `eth_sendTransaction`, so the node (or a signer proxy in
//! front of it) must manage the sending account. Confirmation polls
//! `eth_getTransactionReceipt` until the receipt is buried under the
//! configured number of blocks or the timeout elapses.

use alloy_primitives::{Bytes, B256};
use async_trait::async_trait;
use chaindeploy_core::{Account, ChainClient, DeployError, PreparedTransaction, TransactionReceipt};
use chaindeploy_evm::revert::decode_revert_reason;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::error::TransportError;
use crate::http::{HttpClientConfig, HttpTransport};
use crate::request::{JsonRpcError, JsonRpcRequest};
use crate::transport::RpcTransport;
use crate::wire::{parse_hex_u64, RpcReceipt};

/// How long and how often to wait for a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Receipt polling interval (milliseconds).
    pub poll_interval_ms: u64,
    /// Give up after this long (milliseconds). The transaction may still be
    /// mined afterwards.
    pub timeout_ms: u64,
    /// Blocks required including the inclusion block. `1` means "included".
    pub confirmations: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            timeout_ms: 120_000,
            confirmations: 1,
        }
    }
}

/// A [`ChainClient`] speaking JSON-RPC through any [`RpcTransport`].
pub struct RpcChainClient {
    transport: Arc<dyn RpcTransport>,
    confirmation: ConfirmationConfig,
    next_id: AtomicU64,
}

impl RpcChainClient {
    pub fn new(transport: Arc<dyn RpcTransport>, confirmation: ConfirmationConfig) -> Self {
        Self {
            transport,
            confirmation,
            next_id: AtomicU64::new(1),
        }
    }

    /// A client over HTTP.
    pub fn http(
        url: impl Into<String>,
        http: HttpClientConfig,
        confirmation: ConfirmationConfig,
    ) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(HttpTransport::new(url, http)?), confirmation))
    }

    pub fn url(&self) -> &str {
        self.transport.url()
    }

    /// Call `method` and deserialize its result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let resp = self
            .transport
            .send(JsonRpcRequest::new(id, method, params))
            .await?;
        let result = resp.into_result().map_err(TransportError::Rpc)?;
        serde_json::from_value(result).map_err(TransportError::Deserialization)
    }

    /// The network's chain ID (`eth_chainId`).
    pub async fn chain_id(&self) -> Result<u64, TransportError> {
        let hex: String = self.call("eth_chainId", vec![]).await?;
        parse_hex_u64(&hex)
    }

    async fn latest_block(&self) -> Result<u64, TransportError> {
        let hex: String = self.call("eth_blockNumber", vec![]).await?;
        parse_hex_u64(&hex)
    }

    fn tx_object(tx: &PreparedTransaction, account: &Account) -> Value {
        json!({
            "from": account.address,
            "to": tx.to,
            "data": tx.data,
            "value": tx.value,
        })
    }

    async fn broadcast(
        &self,
        tx: &PreparedTransaction,
        account: &Account,
    ) -> Result<B256, DeployError> {
        self.call("eth_sendTransaction", vec![Self::tx_object(tx, account)])
            .await
            .map_err(|e| {
                if let TransportError::Rpc(rpc) = &e {
                    if e.is_execution_revert() {
                        let reason = match rpc_revert_reason(rpc) {
                            Some(r) => format!("execution reverted: {r}"),
                            None => rpc.message.clone(),
                        };
                        return DeployError::Chain {
                            reason,
                            tx_hash: None,
                            receipt: None,
                        };
                    }
                }
                DeployError::from(e)
            })
    }

    /// Poll until the receipt has the configured confirmations.
    pub async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt, DeployError> {
        let deadline = Instant::now() + Duration::from_millis(self.confirmation.timeout_ms);
        let poll = Duration::from_millis(self.confirmation.poll_interval_ms);
        let network = |e: TransportError| DeployError::Network {
            reason: e.to_string(),
            tx_hash: Some(tx_hash),
        };

        let receipt = loop {
            let found: Option<RpcReceipt> = self
                .call("eth_getTransactionReceipt", vec![json!(tx_hash)])
                .await
                .map_err(network)?;
            if let Some(r) = found {
                break r.into_receipt().map_err(network)?;
            }
            self.sleep_or_timeout(deadline, poll, tx_hash).await?;
        };

        if self.confirmation.confirmations > 1 {
            let target = receipt
                .block_number
                .saturating_add(self.confirmation.confirmations - 1);
            loop {
                let head = self.latest_block().await.map_err(network)?;
                if head >= target {
                    break;
                }
                tracing::trace!(%tx_hash, head, target, "waiting for confirmations");
                self.sleep_or_timeout(deadline, poll, tx_hash).await?;
            }
        }
        Ok(receipt)
    }

    async fn sleep_or_timeout(
        &self,
        deadline: Instant,
        poll: Duration,
        tx_hash: B256,
    ) -> Result<(), DeployError> {
        let now = Instant::now();
        if now >= deadline {
            return Err(DeployError::Network {
                reason: format!(
                    "transaction {tx_hash} not confirmed within {}ms",
                    self.confirmation.timeout_ms
                ),
                tx_hash: Some(tx_hash),
            });
        }
        tokio::time::sleep(poll.min(deadline - now)).await;
        Ok(())
    }

    /// Replay a failed transaction with `eth_call` at its block to recover
    /// the revert reason. Best effort.
    async fn replay_revert_reason(
        &self,
        tx: &PreparedTransaction,
        account: &Account,
        block: u64,
    ) -> Option<String> {
        let block = format!("0x{block:x}");
        match self
            .call::<Bytes>("eth_call", vec![Self::tx_object(tx, account), json!(block)])
            .await
        {
            Err(TransportError::Rpc(rpc)) => rpc_revert_reason(&rpc),
            Err(e) => {
                tracing::debug!(error = %e, "revert replay failed");
                None
            }
            Ok(_) => None,
        }
    }
}

/// Decode the revert payload some nodes attach to an RPC error, either as a
/// hex string or as `{ "data": "0x..." }`.
fn rpc_revert_reason(err: &JsonRpcError) -> Option<String> {
    let raw = match err.data.as_ref()? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("data")?.as_str()?,
        _ => return None,
    };
    let bytes: Bytes = raw.parse().ok()?;
    decode_revert_reason(&bytes)
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn block_number(&self) -> Result<u64, DeployError> {
        Ok(self.latest_block().await?)
    }

    async fn submit_and_confirm(
        &self,
        tx: &PreparedTransaction,
        account: &Account,
    ) -> Result<TransactionReceipt, DeployError> {
        let tx_hash = self.broadcast(tx, account).await?;
        tracing::info!(
            %tx_hash,
            to = %tx.to,
            from = %account,
            url = %self.url(),
            "transaction broadcast"
        );

        let receipt = self.wait_for_receipt(tx_hash).await?;
        if !receipt.status {
            let reason = self
                .replay_revert_reason(tx, account, receipt.block_number)
                .await;
            return Err(DeployError::reverted(receipt, reason));
        }
        Ok(receipt)
    }
}
