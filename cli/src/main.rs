//! ChainCall CLI — batched read-only contract calls through Multicall3.
//!
//! # Commands
//! ```text
//! chaincall balances      --token <addr> --holder <addr>...
//! chaincall allowances    --token <addr> --pair <owner>:<spender>...
//! chaincall eth-balances  --holder <addr>...
//! chaincall call          --target <addr> --signature <sig> --input <value>...
//! ```

use anyhow::{Context, Result};
use alloy_primitives::Address;
use chaincall_batch::MulticallClient;
use chaincall_core::{BlockTag, CallOptions, MulticallConfig};
use chaincall_rpc::{HttpRpcClient, RpcCallExecutor};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod cmd_call;
mod cmd_erc20;
mod config;
mod format;
mod logging;

use config::FileConfig;

#[derive(Parser)]
#[command(
    name = "chaincall",
    about = "Batched contract reads through Multicall3",
    long_about = "
ChainCall CLI: run thousands of read-only contract calls as a handful of
Multicall3 aggregate calls, with results printed in input order.

ENVIRONMENT VARIABLES:
  CHAINCALL_RPC_URL   JSON-RPC endpoint (overrides rpc_url in --config)
  RUST_LOG            tracing filter (overrides the log section of --config)
",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "CHAINCALL_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Block to read at: latest, pending, safe, finalized, earliest or a number
    #[arg(long, global = true, default_value = "latest")]
    block: BlockTag,

    /// Sender address for the eth_call
    #[arg(long, global = true)]
    from: Option<Address>,

    /// Max in-flight aggregate calls (negative = unlimited)
    #[arg(long, global = true, allow_negative_numbers = true)]
    concurrency: Option<i64>,

    /// Aggregator contract address (default: canonical Multicall3)
    #[arg(long, global = true)]
    multicall_address: Option<Address>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// ERC-20 balanceOf for many holders
    Balances {
        /// Token contract
        #[arg(long)]
        token: Address,
        /// Holder address (repeatable)
        #[arg(long = "holder", required = true, num_args = 1..)]
        holders: Vec<Address>,
    },

    /// ERC-20 allowance for many owner/spender pairs
    Allowances {
        /// Token contract
        #[arg(long)]
        token: Address,
        /// `<owner>:<spender>` (repeatable)
        #[arg(long = "pair", required = true, num_args = 1..)]
        pairs: Vec<cmd_erc20::Pair>,
    },

    /// Native balances, read through the aggregator
    #[command(name = "eth-balances")]
    EthBalances {
        /// Holder address (repeatable)
        #[arg(long = "holder", required = true, num_args = 1..)]
        holders: Vec<Address>,
    },

    /// Any view function over a list of inputs
    Call(cmd_call::CallArgs),
}

/// Everything a command needs to reach the chain.
pub struct Session {
    pub client: MulticallClient,
    pub options: CallOptions,
    pub json: bool,
}

impl Session {
    fn build(global: &GlobalArgs, file: FileConfig) -> Result<Self> {
        let rpc_url = global
            .rpc_url
            .clone()
            .or(file.rpc_url)
            .context("no RPC endpoint: pass --rpc-url, set CHAINCALL_RPC_URL or add rpc_url to --config")?;

        let mut multicall: MulticallConfig = file.multicall;
        if let Some(address) = global.multicall_address {
            multicall = multicall.with_multicall_address(address);
        }
        if let Some(n) = global.concurrency {
            multicall = multicall.with_max_concurrent_calls(n);
        }

        let transport = HttpRpcClient::new(&rpc_url, file.http)
            .with_context(|| format!("connecting to {rpc_url}"))?;
        let executor = RpcCallExecutor::new(Arc::new(transport));

        tracing::debug!(
            url = %rpc_url,
            aggregator = %multicall.aggregator(),
            concurrency = ?multicall.concurrency(),
            "session ready"
        );

        Ok(Self {
            client: MulticallClient::with_config(Arc::new(executor), multicall),
            options: CallOptions {
                block: global.block,
                from: global.from,
            },
            json: global.json,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut file = FileConfig::load(cli.global.config.as_deref())?;
    file.log = file.log.with_verbosity(cli.global.verbose);
    logging::init_tracing(&file.log)?;

    let session = Session::build(&cli.global, file)?;

    match cli.command {
        Commands::Balances { token, holders } => {
            cmd_erc20::balances(&session, token, &holders).await
        }
        Commands::Allowances { token, pairs } => {
            cmd_erc20::allowances(&session, token, &pairs).await
        }
        Commands::EthBalances { holders } => cmd_erc20::eth_balances(&session, &holders).await,
        Commands::Call(args) => cmd_call::run(&session, args).await,
    }
}
