//! Error types for the deployment pipeline.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::receipt::TransactionReceipt;

/// Errors that can terminate a deployment.
///
/// The core never retries on its own; see [`DeployError::is_retryable`].
#[derive(Debug, Error)]
pub enum DeployError {
    /// The request cannot be executed as given (no resolvable target,
    /// unencodable init calldata). Raised before any network call.
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Transport/RPC failure during classification, lookup or submission.
    #[error("Network error: {reason}")]
    Network {
        reason: String,
        /// Set when the failure happened after broadcast (e.g. confirmation timeout).
        tx_hash: Option<B256>,
    },

    /// The transaction reverted or failed on-chain.
    #[error("Chain error: {reason}")]
    Chain {
        reason: String,
        tx_hash: Option<B256>,
        /// The receipt of the failed transaction, when one was obtained.
        receipt: Option<Box<TransactionReceipt>>,
    },

    /// The confirmed receipt does not reflect the expected on-chain effect.
    #[error("No {event} event found in transaction: {tx_hash}")]
    Protocol { event: String, tx_hash: B256 },
}

/// Discriminant of [`DeployError`] for programmatic matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Configuration,
    Network,
    Chain,
    Protocol,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Network => write!(f, "network"),
            Self::Chain => write!(f, "chain"),
            Self::Protocol => write!(f, "protocol"),
        }
    }
}

impl DeployError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }

    pub fn network(reason: impl Into<String>) -> Self {
        Self::Network {
            reason: reason.into(),
            tx_hash: None,
        }
    }

    /// A revert detected from a receipt with `status == 0`.
    pub fn reverted(receipt: TransactionReceipt, reason: Option<String>) -> Self {
        let reason = match reason {
            Some(r) => format!("transaction {} reverted: {r}", receipt.transaction_hash),
            None => format!("transaction {} reverted", receipt.transaction_hash),
        };
        Self::Chain {
            reason,
            tx_hash: Some(receipt.transaction_hash),
            receipt: Some(Box::new(receipt)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Network { .. } => ErrorKind::Network,
            Self::Chain { .. } => ErrorKind::Chain,
            Self::Protocol { .. } => ErrorKind::Protocol,
        }
    }

    /// The transaction hash involved, if the failure happened after broadcast.
    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            Self::Configuration { .. } => None,
            Self::Network { tx_hash, .. } | Self::Chain { tx_hash, .. } => *tx_hash,
            Self::Protocol { tx_hash, .. } => Some(*tx_hash),
        }
    }

    /// Returns `true` only for transport failures.
    ///
    /// Re-invoking a deployment is only idempotent when the caller pins an
    /// explicit salt; a block-height salt changes between attempts.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
