//! Offline network classification from a list of known chain IDs.

use async_trait::async_trait;
use chaindeploy_core::{Chain, ChainClassifier, DeployError};
use std::collections::HashSet;

/// Chain IDs of networks that deploy through the zkSync `ContractDeployer`.
pub const ALTERNATE_CHAIN_IDS: &[u64] = &[
    324,       // zkSync Era
    300,       // zkSync Sepolia
    302,       // zkCandy Sepolia
    11124,     // Abstract testnet
    282,       // Cronos zkEVM testnet
    388,       // Cronos zkEVM
    4654,      // Creator testnet
    333271,
    37111,     // Lens testnet
    978658,    // Treasure Topaz
    531050104, // Sophon testnet
    4457845,   // ZERO testnet
    2741,      // Abstract
    240,
    61166,     // Treasure
    555271,
    555272,
];

/// Chain IDs known to run the standard EVM deployment model.
pub const STANDARD_CHAIN_IDS: &[u64] = &[
    1, 10, 56, 100, 137, 250, 1101, 5000, 8453, 17000, 42161, 42170, 43114, 59144, 81457,
    84532, 421614, 534352, 11155111, 11155420,
];

/// Classifies networks from static ID lists. Unknown networks are an error,
/// never a guess.
#[derive(Debug, Clone)]
pub struct KnownChainClassifier {
    alternate: HashSet<u64>,
    standard: HashSet<u64>,
}

impl Default for KnownChainClassifier {
    fn default() -> Self {
        Self {
            alternate: ALTERNATE_CHAIN_IDS.iter().copied().collect(),
            standard: STANDARD_CHAIN_IDS.iter().copied().collect(),
        }
    }
}

impl KnownChainClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an additional alternate-model chain.
    pub fn with_alternate(mut self, id: u64) -> Self {
        self.standard.remove(&id);
        self.alternate.insert(id);
        self
    }

    /// Register an additional standard-model chain.
    pub fn with_standard(mut self, id: u64) -> Self {
        self.alternate.remove(&id);
        self.standard.insert(id);
        self
    }

    /// `Some(answer)` when the chain is in one of the lists or is local.
    pub fn lookup(&self, chain: &Chain) -> Option<bool> {
        if self.alternate.contains(&chain.id) {
            Some(true)
        } else if self.standard.contains(&chain.id) || chain.is_local() {
            Some(false)
        } else {
            None
        }
    }
}

#[async_trait]
impl ChainClassifier for KnownChainClassifier {
    async fn uses_alternate_model(&self, chain: &Chain) -> Result<bool, DeployError> {
        self.lookup(chain).ok_or_else(|| {
            DeployError::network(format!(
                "cannot determine the execution model of {chain}: not in the known chain list"
            ))
        })
    }
}
