//! Deployment request types and the resolve-then-use step.

use alloy_primitives::{Address, Bytes};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

use crate::chain::Chain;
use crate::error::DeployError;

/// The sender of a deployment transaction.
///
/// The key itself stays with whoever signs (the node, a remote signer);
/// the pipeline only needs to name the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

/// Where an initialization transaction points: the implementation contract.
///
/// The address may be known up front or only after some async work (for
/// instance, waiting for the implementation's own deployment). Resolving
/// consumes the target, so it happens exactly once per request.
pub enum DeployTarget {
    Ready(Option<Address>),
    Lazy(BoxFuture<'static, Result<Option<Address>, DeployError>>),
}

impl DeployTarget {
    pub fn address(address: Address) -> Self {
        Self::Ready(Some(address))
    }

    /// A target with no address; resolving it fails.
    pub fn none() -> Self {
        Self::Ready(None)
    }

    pub fn lazy<F>(fut: F) -> Self
    where
        F: Future<Output = Result<Option<Address>, DeployError>> + Send + 'static,
    {
        Self::Lazy(Box::pin(fut))
    }

    /// Resolve to a concrete address.
    ///
    /// An empty resolution is a [`DeployError::Configuration`].
    pub async fn resolve(self) -> Result<Address, DeployError> {
        let resolved = match self {
            Self::Ready(addr) => addr,
            Self::Lazy(fut) => fut.await?,
        };
        resolved.ok_or_else(|| {
            DeployError::configuration("initialization transaction must have a target address set")
        })
    }
}

impl fmt::Debug for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(addr) => f.debug_tuple("Ready").field(addr).finish(),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

impl From<Address> for DeployTarget {
    fn from(address: Address) -> Self {
        Self::address(address)
    }
}

/// The call that initializes a freshly created proxy.
#[derive(Debug)]
pub struct InitializationTransaction {
    /// The implementation contract the proxy delegates to.
    pub target: DeployTarget,
    /// Encoded initializer calldata, selector included.
    pub data: Bytes,
}

impl InitializationTransaction {
    pub fn new(target: impl Into<DeployTarget>, data: impl Into<Bytes>) -> Self {
        Self {
            target: target.into(),
            data: data.into(),
        }
    }

    /// The calldata the proxy will be initialized with.
    pub fn encode(&self) -> Bytes {
        self.data.clone()
    }
}

/// Everything one deployment needs. Created per call, consumed by it.
#[derive(Debug)]
pub struct DeploymentRequest {
    pub chain: Chain,
    pub account: Account,
    /// The factory contract creating the proxy.
    pub factory: Address,
    pub init: InitializationTransaction,
    /// Raw salt string; `None` falls back to the current block height.
    pub salt: Option<String>,
}

impl DeploymentRequest {
    pub fn new(
        chain: Chain,
        account: Account,
        factory: Address,
        init: InitializationTransaction,
    ) -> Self {
        Self {
            chain,
            account,
            factory,
            init,
            salt: None,
        }
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    /// Resolve the initialization target. No network access happens here
    /// beyond whatever the lazy target itself awaits.
    pub async fn resolve(self) -> Result<ResolvedDeployment, DeployError> {
        let data = self.init.encode();
        let implementation = self.init.target.resolve().await?;
        Ok(ResolvedDeployment {
            chain: self.chain,
            account: self.account,
            factory: self.factory,
            implementation,
            init_data: data,
            salt: self.salt.filter(|s| !s.is_empty()),
        })
    }
}

/// A request whose implementation target has been resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDeployment {
    pub chain: Chain,
    pub account: Account,
    pub factory: Address,
    pub implementation: Address,
    pub init_data: Bytes,
    /// Non-empty raw salt string, if one was supplied.
    pub salt: Option<String>,
}
