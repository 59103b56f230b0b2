//! Definitions of CLI arguments and commands for deploy scripts

use std::{path::PathBuf, sync::Arc};

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    commands::deploy_all,
    config::{Network, NetworkConfig},
    constants::{
        DEFAULT_ABORT_WINDOW, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DILUTION_BOUND,
        DEFAULT_GRACE_PERIOD_LENGTH, DEFAULT_MOLOCH_ARTIFACT_PATH, DEFAULT_PERIOD_DURATION,
        DEFAULT_TOKEN_ARTIFACT_PATH, DEFAULT_TOKEN_SUPPLY, DEFAULT_VOTING_PERIOD_LENGTH,
    },
    errors::ScriptError,
};

/// The deploy scripts CLI
#[derive(Parser)]
pub struct Cli {
    /// Mnemonic of the deployer wallet
    #[arg(short, long, env = "MNEMONIC", hide_env_values = true)]
    pub mnemonic: String,

    /// The network to deploy to
    #[arg(short, long, value_enum, default_value_t = Network::Develop)]
    pub network: Network,

    /// Overrides the selected network's RPC URL
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// Path to the `deployments.json` file
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: String,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The available commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the token + Moloch dependency graph
    DeployAll(DeployAllArgs),
}

impl Command {
    /// Runs the command against the given client and network configuration
    pub async fn run(
        self,
        client: Arc<impl Middleware>,
        config: &NetworkConfig,
        deployments_path: &str,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployAll(args) => deploy_all(args, client, config, deployments_path).await,
        }
    }
}

/// Deploy the token and Moloch contracts in dependency order.
///
/// Contracts already recorded in the deployments file, or known to be
/// deployed on the selected network, are skipped. The Moloch receives the
/// token's resolved address as its `approvedToken` constructor argument.
#[derive(Args)]
pub struct DeployAllArgs {
    /// Total token supply minted to the deployer, in base units
    #[arg(long, default_value = DEFAULT_TOKEN_SUPPLY)]
    pub token_supply: String,

    /// Moloch period duration, in seconds
    #[arg(long, default_value_t = DEFAULT_PERIOD_DURATION)]
    pub period_duration: u64,

    /// Moloch voting period length, in periods
    #[arg(long, default_value_t = DEFAULT_VOTING_PERIOD_LENGTH)]
    pub voting_period_length: u64,

    /// Moloch grace period length, in periods
    #[arg(long, default_value_t = DEFAULT_GRACE_PERIOD_LENGTH)]
    pub grace_period_length: u64,

    /// Moloch proposal abort window, in periods
    #[arg(long, default_value_t = DEFAULT_ABORT_WINDOW)]
    pub abort_window: u64,

    /// Moloch dilution bound, the maximum multiplier a YES voter is
    /// obligated to pay in case of mass ragequit
    #[arg(long, default_value_t = DEFAULT_DILUTION_BOUND)]
    pub dilution_bound: u64,

    /// Path to the token contract's compilation artifact
    #[arg(long, default_value = DEFAULT_TOKEN_ARTIFACT_PATH)]
    pub token_artifact: PathBuf,

    /// Path to the Moloch contract's compilation artifact
    #[arg(long, default_value = DEFAULT_MOLOCH_ARTIFACT_PATH)]
    pub moloch_artifact: PathBuf,
}
