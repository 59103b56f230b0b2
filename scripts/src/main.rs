use clap::Parser;
use scripts::{chain::setup_client, cli::Cli, config::NetworkConfig, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        mnemonic,
        network,
        rpc_url,
        deployments_path,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let mut config = NetworkConfig::for_network(network);
    if let Some(rpc_url) = rpc_url {
        config.rpc_url = rpc_url;
    }

    let client = setup_client(&mnemonic, &config.rpc_url).await?;

    command.run(client, &config, &deployments_path).await
}
