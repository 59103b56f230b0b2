//! Implementations of the various deploy scripts

use std::{path::Path, sync::Arc};

use ethers::providers::Middleware;

use crate::{
    chain::EthersChain,
    cli::DeployAllArgs,
    config::NetworkConfig,
    deployments::AddressBook,
    errors::ScriptError,
    orchestrator,
    targets::moloch_deployment_targets,
};

/// Deploys the full contract dependency graph, resuming from the
/// deployments file if a previous run left targets unresolved
pub async fn deploy_all(
    args: DeployAllArgs,
    client: Arc<impl Middleware>,
    config: &NetworkConfig,
    deployments_path: &str,
) -> Result<(), ScriptError> {
    let mut book = AddressBook::load(Path::new(deployments_path))?
        .with_known_addresses(&config.known_addresses);
    let targets = moloch_deployment_targets(&args)?;
    let chain = EthersChain::new(client, config)?;

    let report = orchestrator::deploy_all(&chain, &targets, &mut book).await;

    for (name, outcome) in report.iter() {
        println!("{}: {}", name, outcome);
    }

    match report.unresolved_count() {
        0 => Ok(()),
        n => Err(ScriptError::IncompleteDeployment(n)),
    }
}
