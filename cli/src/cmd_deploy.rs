//! `chaindeploy deploy`: run the full pipeline against a node.
//!
//! The sending account must be unlocked on the node (or behind a signer
//! proxy): transactions go out through `eth_sendTransaction`.

use alloy_primitives::{Address, B256};
use anyhow::{anyhow, Result};
use chaindeploy_core::{Account, Chain, DeploymentRequest, InitializationTransaction};
use chaindeploy_evm::DeployerBuilder;
use chaindeploy_rpc::{RpcChainClassifier, RpcChainClient};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DeployConfig;
use crate::InitArgs;

#[derive(Args)]
pub struct DeployArgs {
    /// deploy.json with defaults for everything below
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub rpc: Option<String>,
    /// Chain ID; read from the node when omitted
    #[arg(long)]
    pub chain_id: Option<u64>,
    /// Sending account (must be managed by the node)
    #[arg(long)]
    pub from: Option<Address>,
    #[arg(long)]
    pub factory: Option<Address>,
    #[arg(long)]
    pub implementation: Address,
    #[command(flatten)]
    pub init: InitArgs,
    /// Salt string; the current block height is used when omitted
    #[arg(long)]
    pub salt: Option<String>,
    /// Force the zkSync path (true) or the factory path (false)
    #[arg(long)]
    pub alternate: Option<bool>,
    /// Versioned bytecode hash of the proxy for the zkSync path
    #[arg(long)]
    pub zksync_bytecode_hash: Option<B256>,
    #[arg(long)]
    pub confirmations: Option<u64>,
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: DeployArgs) -> Result<()> {
    let mut config = DeployConfig::load_or_default(args.config.as_deref())?;
    if let Some(n) = args.confirmations {
        config.confirmation.confirmations = n;
    }
    if let Some(ms) = args.timeout_ms {
        config.confirmation.timeout_ms = ms;
    }
    if let Some(hash) = args.zksync_bytecode_hash {
        config.zksync.proxy_bytecode_hash = hash;
    }

    let from = args
        .from
        .or(config.from)
        .ok_or_else(|| anyhow!("no sending account: pass --from or set \"from\" in the config"))?;
    let factory = args
        .factory
        .or(config.factory)
        .ok_or_else(|| anyhow!("no factory: pass --factory or set \"factory\" in the config"))?;

    let url = config.rpc_url(args.rpc.as_deref());
    let client = Arc::new(RpcChainClient::http(
        url.as_str(),
        config.http(),
        config.confirmation.clone(),
    )?);

    let chain_id = match args.chain_id.or(config.chain_id) {
        Some(id) => id,
        None => client.chain_id().await?,
    };
    let name = config
        .chain_name
        .clone()
        .unwrap_or_else(|| format!("chain-{chain_id}"));
    let chain = Chain {
        uses_alternate_execution_model: args.alternate.or(config.alternate),
        ..Chain::new(chain_id, name)
    };
    tracing::debug!(
        rpc = %url,
        chain = %chain,
        from = %from,
        factory = %factory,
        confirmations = config.confirmation.confirmations,
        "deploy configured"
    );

    let orchestrator = DeployerBuilder::new(client.clone())
        .classifier(Arc::new(RpcChainClassifier::new(client)))
        .zksync(config.zksync.clone())
        .build();

    let mut request = DeploymentRequest::new(
        chain.clone(),
        Account::new(from),
        factory,
        InitializationTransaction::new(args.implementation, args.init.encode()?),
    );
    if let Some(salt) = args.salt {
        request = request.with_salt(salt);
    }

    let proxy = orchestrator.deploy(request).await?;
    if args.json {
        println!(
            "{}",
            json!({ "proxy": proxy, "chain_id": chain.id, "factory": factory, "rpc": url })
        );
    } else {
        println!("Proxy deployed at {proxy} on {chain}");
    }
    Ok(())
}
