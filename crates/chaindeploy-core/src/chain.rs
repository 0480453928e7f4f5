//! Target network identity and execution-model capability.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A deployment target network.
///
/// `uses_alternate_execution_model` is the caller's knowledge about the
/// network: `Some(true)` for zkSync-style chains, `Some(false)` for the
/// standard EVM model, `None` when the classifier has to find out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chain {
    /// EVM chain ID (e.g. 1 for Ethereum mainnet, 324 for zkSync Era).
    pub id: u64,
    /// Human-readable slug, e.g. "ethereum", "zksync-era".
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_alternate_execution_model: Option<bool>,
}

impl Chain {
    /// A chain whose execution model is not yet known.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            uses_alternate_execution_model: None,
        }
    }

    /// A chain known to use the standard EVM deployment model.
    pub fn standard(id: u64, name: impl Into<String>) -> Self {
        Self {
            uses_alternate_execution_model: Some(false),
            ..Self::new(id, name)
        }
    }

    /// A chain known to use the alternate (zkSync-style) deployment model.
    pub fn alternate(id: u64, name: impl Into<String>) -> Self {
        Self {
            uses_alternate_execution_model: Some(true),
            ..Self::new(id, name)
        }
    }

    /// Returns `true` if this is a local development chain (anvil, hardhat).
    pub fn is_local(&self) -> bool {
        matches!(self.id, 1337 | 31337)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Well-known chains for convenience.
pub mod chains {
    use super::Chain;

    pub fn ethereum() -> Chain { Chain::standard(1, "ethereum") }
    pub fn sepolia() -> Chain { Chain::standard(11155111, "sepolia") }
    pub fn base() -> Chain { Chain::standard(8453, "base") }
    pub fn arbitrum() -> Chain { Chain::standard(42161, "arbitrum") }
    pub fn zksync_era() -> Chain { Chain::alternate(324, "zksync-era") }
    pub fn zksync_sepolia() -> Chain { Chain::alternate(300, "zksync-sepolia") }
    pub fn abstract_mainnet() -> Chain { Chain::alternate(2741, "abstract") }
    pub fn anvil() -> Chain { Chain::standard(31337, "anvil") }
}
