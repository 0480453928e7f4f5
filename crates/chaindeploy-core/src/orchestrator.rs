//! `DeploymentOrchestrator`: the public `deploy` operation.
//!
//! ```text
//! Start → resolve target → Classified ─┬─ alternate → AltPath ───────────────────────→ Done
//!                                      └─ standard  → SaltPending → StdPrepared
//!                                                     → Submitted → Confirmed → Decoded → Done
//! ```
//!
//! Any stage may end in `Failed`. The orchestrator only resolves and
//! classifies; everything after the branch belongs to the selected
//! [`DeployStrategy`].

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::chain::Chain;
use crate::client::{ChainClassifier, DeployStrategy};
use crate::error::DeployError;
use crate::request::{Account, DeploymentRequest, ResolvedDeployment};

/// Pipeline stage, emitted as the `stage` field of every deployment log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Start,
    SaltPending,
    Classified,
    AltPath,
    StdPrepared,
    Submitted,
    Confirmed,
    Decoded,
    Done,
    Failed,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::SaltPending => "salt_pending",
            Self::Classified => "classified",
            Self::AltPath => "alt_path",
            Self::StdPrepared => "std_prepared",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Decoded => "decoded",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Composes classification and the two deployment strategies.
///
/// Holds no per-request state; clone it or share it behind an `Arc` across
/// tasks freely.
#[derive(Clone)]
pub struct DeploymentOrchestrator {
    classifier: Arc<dyn ChainClassifier>,
    standard: Arc<dyn DeployStrategy>,
    alternate: Arc<dyn DeployStrategy>,
}

impl DeploymentOrchestrator {
    pub fn new(
        classifier: Arc<dyn ChainClassifier>,
        standard: Arc<dyn DeployStrategy>,
        alternate: Arc<dyn DeployStrategy>,
    ) -> Self {
        Self {
            classifier,
            standard,
            alternate,
        }
    }

    /// Deploy a proxy for `request` and return its address.
    ///
    /// The call performs exactly one attempt. Once the transaction has been
    /// broadcast, dropping the returned future does not retract it: the
    /// proxy may still be created on-chain. Re-invoking after a failure is
    /// only idempotent when the request carries an explicit salt.
    pub async fn deploy(&self, request: DeploymentRequest) -> Result<Address, DeployError> {
        let chain_id = request.chain.id;
        let factory = request.factory;
        let result = self.run(request).await;
        match &result {
            Ok(proxy) => tracing::info!(
                stage = %DeployStage::Done,
                chain_id,
                factory = %factory,
                proxy = %proxy,
                "proxy deployed"
            ),
            Err(e) => tracing::warn!(
                stage = %DeployStage::Failed,
                chain_id,
                factory = %factory,
                kind = %e.kind(),
                tx_hash = ?e.tx_hash(),
                error = %e,
                "deployment failed"
            ),
        }
        result
    }

    async fn run(&self, request: DeploymentRequest) -> Result<Address, DeployError> {
        tracing::debug!(
            stage = %DeployStage::Start,
            chain = %request.chain,
            account = %request.account,
            factory = %request.factory,
            "starting deployment"
        );

        // Resolve before touching the network: a request without a target
        // fails here with zero RPC calls.
        let resolved = request.resolve().await?;

        let alternate = self.classify(&resolved.chain).await?;
        let strategy = if alternate {
            &self.alternate
        } else {
            &self.standard
        };
        tracing::debug!(
            stage = %DeployStage::Classified,
            chain_id = resolved.chain.id,
            alternate,
            strategy = strategy.name(),
            implementation = %resolved.implementation,
            "network classified"
        );

        strategy.deploy(&resolved).await
    }

    /// Whether `chain` needs the alternate protocol. A caller-supplied flag
    /// wins; otherwise the classifier is asked.
    pub async fn classify(&self, chain: &Chain) -> Result<bool, DeployError> {
        match chain.uses_alternate_execution_model {
            Some(flag) => Ok(flag),
            None => self.classifier.uses_alternate_model(chain).await,
        }
    }

    /// Deploy with a known implementation address through the standard
    /// factory path, skipping target resolution and classification.
    ///
    /// Missing init data is sent as empty calldata (`0x`).
    pub async fn deploy_with_implementation(
        &self,
        chain: Chain,
        account: Account,
        factory: Address,
        implementation: Address,
        init_data: Option<Bytes>,
        salt: Option<String>,
    ) -> Result<Address, DeployError> {
        let resolved = ResolvedDeployment {
            chain,
            account,
            factory,
            implementation,
            init_data: init_data.unwrap_or_default(),
            salt: salt.filter(|s| !s.is_empty()),
        };
        tracing::debug!(
            stage = %DeployStage::Start,
            chain = %resolved.chain,
            factory = %factory,
            implementation = %implementation,
            "starting deployment with explicit implementation"
        );
        self.standard.deploy(&resolved).await
    }
}

impl fmt::Debug for DeploymentOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentOrchestrator")
            .field("standard", &self.standard.name())
            .field("alternate", &self.alternate.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::chains;
    use crate::error::ErrorKind;
    use crate::request::{DeployTarget, InitializationTransaction};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FixedClassifier {
        answer: Result<bool, ()>,
        calls: AtomicU32,
    }

    impl FixedClassifier {
        fn new(answer: Result<bool, ()>) -> Arc<Self> {
            Arc::new(Self { answer, calls: AtomicU32::new(0) })
        }
    }

    #[async_trait]
    impl ChainClassifier for FixedClassifier {
        async fn uses_alternate_model(&self, _chain: &Chain) -> Result<bool, DeployError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.answer.map_err(|_| DeployError::network("probe failed"))
        }
    }

    struct RecordingStrategy {
        name: &'static str,
        proxy: Address,
        seen: Mutex<Vec<ResolvedDeployment>>,
    }

    impl RecordingStrategy {
        fn new(name: &'static str, byte: u8) -> Arc<Self> {
            Arc::new(Self {
                name,
                proxy: Address::repeat_byte(byte),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DeployStrategy for RecordingStrategy {
        fn name(&self) -> &str {
            self.name
        }

        async fn deploy(&self, request: &ResolvedDeployment) -> Result<Address, DeployError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.proxy)
        }
    }

    struct Fixture {
        classifier: Arc<FixedClassifier>,
        standard: Arc<RecordingStrategy>,
        alternate: Arc<RecordingStrategy>,
        orchestrator: DeploymentOrchestrator,
    }

    fn fixture(answer: Result<bool, ()>) -> Fixture {
        let classifier = FixedClassifier::new(answer);
        let standard = RecordingStrategy::new("standard", 0x5a);
        let alternate = RecordingStrategy::new("zksync", 0xa1);
        let orchestrator =
            DeploymentOrchestrator::new(classifier.clone(), standard.clone(), alternate.clone());
        Fixture { classifier, standard, alternate, orchestrator }
    }

    fn request(chain: Chain, target: DeployTarget) -> DeploymentRequest {
        DeploymentRequest::new(
            chain,
            Account::new(Address::repeat_byte(0x01)),
            Address::repeat_byte(0xfa),
            InitializationTransaction::new(target, vec![0xaa]),
        )
    }

    #[tokio::test]
    async fn alternate_chain_only_runs_alternate_strategy() {
        let f = fixture(Ok(true));
        let proxy = f
            .orchestrator
            .deploy(request(Chain::new(324, "zk"), Address::repeat_byte(0x0c).into()))
            .await
            .unwrap();
        assert_eq!(proxy, Address::repeat_byte(0xa1));
        assert_eq!(f.alternate.calls(), 1);
        assert_eq!(f.standard.calls(), 0);
        assert_eq!(f.classifier.calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn standard_chain_runs_standard_strategy() {
        let f = fixture(Ok(false));
        let proxy = f
            .orchestrator
            .deploy(
                request(Chain::new(8453, "base"), Address::repeat_byte(0x0c).into())
                    .with_salt("salty"),
            )
            .await
            .unwrap();
        assert_eq!(proxy, Address::repeat_byte(0x5a));
        assert_eq!(f.alternate.calls(), 0);
        let seen = f.standard.seen.lock().unwrap();
        assert_eq!(seen[0].implementation, Address::repeat_byte(0x0c));
        assert_eq!(seen[0].salt.as_deref(), Some("salty"));
    }

    #[tokio::test]
    async fn caller_flag_skips_classifier() {
        let f = fixture(Err(()));
        f.orchestrator
            .deploy(request(chains::zksync_era(), Address::repeat_byte(0x0c).into()))
            .await
            .unwrap();
        assert_eq!(f.classifier.calls.load(Ordering::Relaxed), 0);
        assert_eq!(f.alternate.calls(), 1);
    }

    #[tokio::test]
    async fn missing_target_fails_before_classification() {
        let f = fixture(Ok(false));
        let err = f
            .orchestrator
            .deploy(request(Chain::new(1, "ethereum"), DeployTarget::none()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(f.classifier.calls.load(Ordering::Relaxed), 0);
        assert_eq!(f.standard.calls() + f.alternate.calls(), 0);
    }

    #[tokio::test]
    async fn lazy_target_failure_propagates_unchanged() {
        let f = fixture(Ok(false));
        let target = DeployTarget::lazy(async {
            Err(DeployError::network("implementation lookup timed out"))
        });
        let err = f
            .orchestrator
            .deploy(request(Chain::new(1, "ethereum"), target))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(err.to_string().contains("implementation lookup timed out"));
        assert_eq!(err.tx_hash(), None);
        assert_eq!(f.classifier.calls.load(Ordering::Relaxed), 0);
        assert_eq!(f.standard.calls() + f.alternate.calls(), 0);
    }

    #[tokio::test]
    async fn classifier_failure_propagates_without_fallback() {
        let f = fixture(Err(()));
        let err = f
            .orchestrator
            .deploy(request(Chain::new(999, "mystery"), Address::repeat_byte(0x0c).into()))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
        assert_eq!(f.standard.calls() + f.alternate.calls(), 0);
    }

    #[tokio::test]
    async fn explicit_implementation_always_uses_standard_path() {
        let f = fixture(Ok(true));
        let proxy = f
            .orchestrator
            .deploy_with_implementation(
                chains::zksync_era(),
                Account::new(Address::repeat_byte(0x01)),
                Address::repeat_byte(0xfa),
                Address::repeat_byte(0x0c),
                None,
                None,
            )
            .await
            .unwrap();
        assert_eq!(proxy, Address::repeat_byte(0x5a));
        assert_eq!(f.alternate.calls(), 0);
        let seen = f.standard.seen.lock().unwrap();
        assert!(seen[0].init_data.is_empty());
    }

    #[test]
    fn stage_names() {
        assert_eq!(DeployStage::SaltPending.to_string(), "salt_pending");
        assert_eq!(serde_json::to_string(&DeployStage::AltPath).unwrap(), "\"alt_path\"");
    }
}
