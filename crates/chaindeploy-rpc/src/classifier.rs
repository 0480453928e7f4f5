//! Network classification by probing the node.
//!
//! Chains in the static list are answered offline. Anything else is probed
//! with `zks_L1ChainId`, a method only zkSync-family nodes implement:
//!
//! | probe outcome             | classification           |
//! |---------------------------|--------------------------|
//! | any result                | alternate                |
//! | method not found          | standard                 |
//! | transport or other error  | `DeployError::Network`   |
//!
//! Answers are cached per chain ID for the lifetime of the classifier.

use async_trait::async_trait;
use chaindeploy_core::{Chain, ChainClassifier, DeployError};
use chaindeploy_evm::KnownChainClassifier;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::RpcChainClient;

pub const PROBE_METHOD: &str = "zks_L1ChainId";

pub struct RpcChainClassifier {
    client: Arc<RpcChainClient>,
    known: KnownChainClassifier,
    cache: Mutex<HashMap<u64, bool>>,
}

impl RpcChainClassifier {
    pub fn new(client: Arc<RpcChainClient>) -> Self {
        Self::with_known(client, KnownChainClassifier::new())
    }

    pub fn with_known(client: Arc<RpcChainClient>, known: KnownChainClassifier) -> Self {
        Self {
            client,
            known,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, id: u64) -> Option<bool> {
        self.cache.lock().ok()?.get(&id).copied()
    }

    fn remember(&self, id: u64, alternate: bool) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(id, alternate);
        }
    }

    async fn probe(&self, chain: &Chain) -> Result<bool, DeployError> {
        match self.client.call::<Value>(PROBE_METHOD, vec![]).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_method_not_found() => Ok(false),
            Err(e) => Err(DeployError::network(format!(
                "could not classify {chain}: {PROBE_METHOD} probe failed: {e}"
            ))),
        }
    }
}

#[async_trait]
impl ChainClassifier for RpcChainClassifier {
    async fn uses_alternate_model(&self, chain: &Chain) -> Result<bool, DeployError> {
        if let Some(answer) = self.known.lookup(chain) {
            return Ok(answer);
        }
        if let Some(answer) = self.cached(chain.id) {
            return Ok(answer);
        }

        let alternate = self.probe(chain).await?;
        tracing::debug!(
            chain_id = chain.id,
            alternate,
            url = %self.client.url(),
            "classified by probe"
        );
        self.remember(chain.id, alternate);
        Ok(alternate)
    }
}
