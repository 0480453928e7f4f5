//! Receipt and log shapes as returned by `eth_getTransactionReceipt`.

use alloy_primitives::{Address, Bytes, B256};
use chaindeploy_core::{LogEntry, TransactionReceipt};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_hex_u64(s: &str) -> Result<u64, TransportError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| TransportError::InvalidResponse(format!("bad hex quantity '{s}': {e}")))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(default)]
    pub log_index: Option<String>,
}

impl RpcLog {
    pub fn into_log(self) -> Result<LogEntry, TransportError> {
        let log_index = match self.log_index.as_deref() {
            Some(s) => parse_hex_u64(s)?,
            None => 0,
        };
        Ok(LogEntry {
            address: self.address,
            topics: self.topics,
            data: self.data,
            log_index,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: B256,
    pub block_number: String,
    /// `0x1` success, `0x0` failure. Absent on pre-Byzantium receipts.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

impl RpcReceipt {
    pub fn into_receipt(self) -> Result<TransactionReceipt, TransportError> {
        let status = match self.status.as_deref() {
            Some(s) => parse_hex_u64(s)? == 1,
            None => true,
        };
        let logs = self
            .logs
            .into_iter()
            .map(RpcLog::into_log)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransactionReceipt {
            transaction_hash: self.transaction_hash,
            block_number: parse_hex_u64(&self.block_number)?,
            status,
            logs,
        })
    }
}
