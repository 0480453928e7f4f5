//! ChainDeploy CLI: deterministic proxy deployment from the terminal.
//!
//! # Commands
//! ```text
//! chaindeploy salt      [SALT] [--block <n>]
//! chaindeploy classify  --chain-id <id> [--rpc <url>]
//! chaindeploy prepare   --factory <addr> --implementation <addr> [--init-data <hex> | --init-sig <sig> --args ...] [--salt <s>]
//! chaindeploy deploy    --config <deploy.json> --implementation <addr> [--init-sig <sig> --args ...] [--salt <s>]
//! ```

use alloy_primitives::{Address, Bytes};
use anyhow::{bail, Context, Result};
use chaindeploy_core::salt::{resolve_salt, salt_from_str};
use chaindeploy_core::{Chain, ChainClassifier, InitializationTransaction};
use chaindeploy_evm::{encoder, factory, KnownChainClassifier};
use chaindeploy_rpc::{RpcChainClassifier, RpcChainClient};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;

mod cmd_deploy;
mod config;
mod logging;

use config::DeployConfig;
use logging::{init_tracing, LogConfig};

#[derive(Parser)]
#[command(
    name = "chaindeploy",
    about = "Deterministic proxy deployment through a clone factory",
    long_about = "
ChainDeploy CLI: derive salts, classify networks and deploy proxies.
zkSync-family networks are deployed through the ContractDeployer system contract.

ENVIRONMENT VARIABLES:
  CHAINDEPLOY_RPC_URL   JSON-RPC endpoint used when --rpc and the config omit one
  RUST_LOG              tracing filter, overrides --verbose and the config
",
    version
)]
struct Cli {
    /// Debug-level logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON log lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Initializer calldata, either raw or from a signature plus arguments.
#[derive(Args, Clone)]
pub struct InitArgs {
    /// Raw initializer calldata (0x-prefixed hex)
    #[arg(long, conflicts_with = "init_sig")]
    init_data: Option<Bytes>,
    /// Initializer signature, e.g. "initialize(address,string)"
    #[arg(long)]
    init_sig: Option<String>,
    /// Initializer arguments, coerced to the signature's types
    #[arg(long, num_args = 0.., requires = "init_sig")]
    args: Vec<String>,
}

impl InitArgs {
    pub fn encode(&self) -> Result<Bytes> {
        match (&self.init_data, &self.init_sig) {
            (Some(data), _) => Ok(data.clone()),
            (None, Some(sig)) => {
                let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
                Ok(encoder::encode_call_str(sig, &args)?)
            }
            (None, None) => Ok(Bytes::new()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a salt string to its 32-byte value
    Salt {
        /// Salt string; omit to derive from a block height
        salt: Option<String>,
        /// Block height used when no salt is given
        #[arg(long, default_value_t = 0)]
        block: u64,
        #[arg(long)]
        json: bool,
    },

    /// Report whether a chain needs the zkSync deployment path
    Classify {
        #[arg(long)]
        chain_id: u64,
        /// Probe this RPC endpoint for chains outside the known list
        #[arg(long)]
        rpc: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Build the factory call without sending it
    Prepare {
        #[arg(long)]
        factory: Address,
        #[arg(long)]
        implementation: Address,
        #[command(flatten)]
        init: InitArgs,
        #[arg(long)]
        salt: Option<String>,
        /// RPC endpoint for the block-height salt
        #[arg(long)]
        rpc: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Deploy a proxy and print its address
    Deploy(cmd_deploy::DeployArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let file_log = match &cli.command {
        Commands::Deploy(args) => DeployConfig::load_or_default(args.config.as_deref())?.log,
        _ => LogConfig::default(),
    };
    init_tracing(&LogConfig {
        level: if cli.verbose { "debug".into() } else { file_log.level.clone() },
        json: cli.log_json || file_log.json,
        ..file_log
    });

    match cli.command {
        Commands::Salt { salt, block, json } => cmd_salt(salt.as_deref(), block, json),
        Commands::Classify { chain_id, rpc, json } => {
            cmd_classify(chain_id, rpc.as_deref(), json).await
        }
        Commands::Prepare {
            factory,
            implementation,
            init,
            salt,
            rpc,
            json,
        } => {
            cmd_prepare(
                factory,
                implementation,
                &init,
                salt.as_deref(),
                rpc.as_deref(),
                json,
            )
            .await
        }
        Commands::Deploy(args) => cmd_deploy::run(args).await,
    }
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_salt(salt: Option<&str>, block: u64, as_json: bool) -> Result<()> {
    let (value, source) = match salt.filter(|s| !s.is_empty()) {
        Some(s) => salt_from_str(s),
        None => resolve_salt(None, block),
    };
    if as_json {
        println!("{}", json!({ "salt": value, "source": source }));
    } else {
        println!("{value}  ({source})");
    }
    Ok(())
}

async fn cmd_classify(chain_id: u64, rpc: Option<&str>, as_json: bool) -> Result<()> {
    let chain = Chain::new(chain_id, format!("chain-{chain_id}"));
    let alternate = match rpc {
        Some(url) => {
            let config = DeployConfig::default();
            let client = RpcChainClient::http(url, config.http(), config.confirmation.clone())?;
            RpcChainClassifier::new(Arc::new(client))
                .uses_alternate_model(&chain)
                .await?
        }
        None => KnownChainClassifier::new()
            .uses_alternate_model(&chain)
            .await
            .context("pass --rpc to probe the node")?,
    };
    if as_json {
        println!("{}", json!({ "chain_id": chain_id, "alternate": alternate }));
    } else if alternate {
        println!("chain {chain_id}: zkSync (ContractDeployer path)");
    } else {
        println!("chain {chain_id}: standard (factory path)");
    }
    Ok(())
}

async fn cmd_prepare(
    factory_address: Address,
    implementation: Address,
    init: &InitArgs,
    salt: Option<&str>,
    rpc: Option<&str>,
    as_json: bool,
) -> Result<()> {
    if salt.map_or(true, str::is_empty)
        && rpc.is_none()
        && std::env::var(config::RPC_URL_ENV).is_err()
    {
        bail!(
            "without --salt the block height is needed: pass --rpc or set {}",
            config::RPC_URL_ENV
        );
    }
    let config = DeployConfig::default();
    let client =
        RpcChainClient::http(config.rpc_url(rpc), config.http(), config.confirmation.clone())?;
    let init = InitializationTransaction::new(implementation, init.encode()?);
    let prepared = factory::prepare_deploy_transaction(&client, factory_address, init, salt).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&prepared)?);
    } else {
        println!("To:        {}", prepared.tx.to);
        println!("Data:      {}", prepared.tx.data);
        println!("Salt:      {} ({})", prepared.salt, prepared.salt_source);
        println!("Init data: {}", prepared.init_data);
    }
    Ok(())
}
