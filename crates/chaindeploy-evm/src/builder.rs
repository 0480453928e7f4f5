//! Fluent builder wiring a client, a classifier and both strategies into a
//! [`DeploymentOrchestrator`].
//!
//! # Example
//! ```ignore
//! let orchestrator = DeployerBuilder::new(client)
//!     .zksync(ZkSyncConfig::new(proxy_bytecode_hash))
//!     .build();
//! let proxy = orchestrator.deploy(request).await?;
//! ```

use chaindeploy_core::{ChainClassifier, ChainClient, DeployStrategy, DeploymentOrchestrator};
use std::sync::Arc;

use crate::classifier::KnownChainClassifier;
use crate::standard::StandardDeployer;
use crate::zksync::{ZkSyncConfig, ZkSyncDeployer};

pub struct DeployerBuilder {
    client: Arc<dyn ChainClient>,
    classifier: Option<Arc<dyn ChainClassifier>>,
    zksync: ZkSyncConfig,
    standard: Option<Arc<dyn DeployStrategy>>,
    alternate: Option<Arc<dyn DeployStrategy>>,
}

impl DeployerBuilder {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            classifier: None,
            zksync: ZkSyncConfig::default(),
            standard: None,
            alternate: None,
        }
    }

    /// Use `classifier` instead of the static [`KnownChainClassifier`].
    pub fn classifier(mut self, classifier: Arc<dyn ChainClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn zksync(mut self, config: ZkSyncConfig) -> Self {
        self.zksync = config;
        self
    }

    /// Replace the standard factory strategy.
    pub fn standard_strategy(mut self, strategy: Arc<dyn DeployStrategy>) -> Self {
        self.standard = Some(strategy);
        self
    }

    /// Replace the zkSync strategy.
    pub fn alternate_strategy(mut self, strategy: Arc<dyn DeployStrategy>) -> Self {
        self.alternate = Some(strategy);
        self
    }

    pub fn build(self) -> DeploymentOrchestrator {
        let classifier = self
            .classifier
            .unwrap_or_else(|| Arc::new(KnownChainClassifier::new()));
        let standard = self
            .standard
            .unwrap_or_else(|| Arc::new(StandardDeployer::new(self.client.clone())));
        let alternate = self
            .alternate
            .unwrap_or_else(|| Arc::new(ZkSyncDeployer::new(self.client.clone(), self.zksync)));
        DeploymentOrchestrator::new(classifier, standard, alternate)
    }
}
