//! Transport-level error types.

use chaindeploy_core::DeployError;
use thiserror::Error;

use crate::request::JsonRpcError;

/// JSON-RPC code for an unknown method.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Code geth and most EVM nodes use for `execution reverted`.
pub const EXECUTION_REVERTED: i64 = 3;

/// Errors that can occur during an RPC transport operation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The node answered with something that is not a valid result.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl TransportError {
    /// Returns `true` if this error is retryable (transient).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }

    /// Returns `true` if the node does not implement the called method.
    pub fn is_method_not_found(&self) -> bool {
        match self {
            Self::Rpc(e) => {
                e.code == METHOD_NOT_FOUND
                    || e.message.to_ascii_lowercase().contains("method not found")
                    || e.message.to_ascii_lowercase().contains("does not exist")
            }
            _ => false,
        }
    }

    /// Returns `true` if the node rejected the call because execution reverted.
    pub fn is_execution_revert(&self) -> bool {
        match self {
            Self::Rpc(e) => {
                e.code == EXECUTION_REVERTED || e.message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

impl From<TransportError> for DeployError {
    fn from(e: TransportError) -> Self {
        if e.is_execution_revert() {
            DeployError::Chain {
                reason: e.to_string(),
                tx_hash: None,
                receipt: None,
            }
        } else {
            DeployError::network(e.to_string())
        }
    }
}
