//! Sequencing of the contract dependency graph
//!
//! [`deploy_all`] walks a fixed, pre-ordered list of [`DeploymentTarget`]s:
//! targets already recorded in the [`AddressBook`] are skipped, resolved
//! addresses feed into dependents' constructor arguments, and a failure on
//! one target never aborts unrelated targets or corrupts prior resolutions.
//! Dependents of a failed target are blocked, not attempted.

use std::{
    fmt::{self, Display},
    path::PathBuf,
};

use ethers::{
    abi::Token,
    types::{Address, TxHash},
};
use tracing::{error, info, warn};

use crate::{
    artifacts::read_artifact,
    chain::ChainClient,
    deployments::AddressBook,
    errors::ScriptError,
};

/// The inputs available to a target's constructor-argument builder
pub struct ArgContext<'a> {
    /// The deployer wallet's address
    deployer: Address,
    /// The addresses resolved so far
    book: &'a AddressBook,
}

impl<'a> ArgContext<'a> {
    /// Creates a context over the given book
    pub(crate) fn new(deployer: Address, book: &'a AddressBook) -> Self {
        ArgContext { deployer, book }
    }

    /// The deployer wallet's address
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// Returns the resolved address of the named contract.
    ///
    /// The orchestrator only invokes a builder once the target's declared
    /// dependencies are resolved, so a miss here indicates a wiring bug
    /// between the dependency list and the builder.
    pub fn address_of(&self, name: &str) -> Result<Address, ScriptError> {
        self.book.resolved(name).ok_or_else(|| {
            ScriptError::ArgumentMismatch(format!("dependency `{}` is unresolved", name))
        })
    }
}

/// Builds a target's ordered constructor arguments from the resolved
/// addresses of its dependencies
pub type ArgBuilder = Box<dyn Fn(&ArgContext<'_>) -> Result<Vec<Token>, ScriptError> + Send + Sync>;

/// One contract in the dependency graph
pub struct DeploymentTarget {
    /// The contract's key in the deployments file
    pub name: String,
    /// The path to the contract's compilation artifact
    pub artifact_path: PathBuf,
    /// The deployments-file keys of the contracts this target's
    /// constructor arguments depend on
    pub dependencies: Vec<String>,
    /// The constructor-argument builder
    pub build_args: ArgBuilder,
}

impl std::fmt::Debug for DeploymentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentTarget")
            .field("name", &self.name)
            .field("artifact_path", &self.artifact_path)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// The stage of the pipeline at which a target failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the compilation artifact
    Artifact,
    /// Building arguments and broadcasting the creation transaction
    Broadcast,
    /// Waiting for the transaction's confirmation
    Confirmation,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Artifact => write!(f, "artifact read"),
            Stage::Broadcast => write!(f, "broadcast"),
            Stage::Confirmation => write!(f, "confirmation"),
        }
    }
}

/// The terminal outcome of one target within a run
#[derive(Debug)]
pub enum TargetOutcome {
    /// The contract's address is known, either from this run or a prior one
    Resolved {
        /// The contract's on-chain address
        address: Address,
        /// Whether this run deployed the contract, as opposed to finding
        /// it already resolved
        newly_deployed: bool,
    },
    /// The target failed at the given stage
    Failed {
        /// The pipeline stage that failed
        stage: Stage,
        /// The underlying error
        error: ScriptError,
    },
    /// The target was not attempted because a dependency is unresolved
    DependencyBlocked {
        /// The unresolved dependency
        dependency: String,
    },
    /// The target was not attempted because the run was aborted
    NotAttempted,
}

impl TargetOutcome {
    /// Whether the target's address is known
    pub fn is_resolved(&self) -> bool {
        matches!(self, TargetOutcome::Resolved { .. })
    }
}

impl Display for TargetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetOutcome::Resolved {
                address,
                newly_deployed: true,
            } => write!(f, "deployed at {:#x}", address),
            TargetOutcome::Resolved {
                address,
                newly_deployed: false,
            } => write!(f, "already deployed at {:#x}", address),
            TargetOutcome::Failed { stage, error } => {
                write!(f, "failed during {}: {}", stage, error)
            }
            TargetOutcome::DependencyBlocked { dependency } => {
                write!(f, "not attempted, dependency `{}` unresolved", dependency)
            }
            TargetOutcome::NotAttempted => write!(f, "not attempted, run aborted"),
        }
    }
}

/// The per-target outcomes of one `deploy_all` run, in target order
pub struct DeploymentReport {
    /// Target name paired with its outcome
    outcomes: Vec<(String, TargetOutcome)>,
}

impl DeploymentReport {
    /// Iterates the outcomes in target order
    pub fn iter(&self) -> impl Iterator<Item = &(String, TargetOutcome)> {
        self.outcomes.iter()
    }

    /// Returns the outcome recorded for the given target
    pub fn outcome(&self, name: &str) -> Option<&TargetOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// The number of targets whose address is not resolved
    pub fn unresolved_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_resolved())
            .count()
    }
}

/// Deploys the given targets in order, recording resolutions in the book.
///
/// Never returns an error; every target gets a per-target outcome. A
/// [`ScriptError::ProviderUnavailable`] failure aborts the remainder of the
/// run, since later results against an unreliable connection would be
/// meaningless.
pub async fn deploy_all<C: ChainClient>(
    chain: &C,
    targets: &[DeploymentTarget],
    book: &mut AddressBook,
) -> DeploymentReport {
    let mut outcomes = Vec::with_capacity(targets.len());
    let mut aborted = false;

    for target in targets {
        if aborted {
            outcomes.push((target.name.clone(), TargetOutcome::NotAttempted));
            continue;
        }

        if let Some(address) = book.resolved(&target.name) {
            info!(contract = %target.name, address = ?address, "already deployed, skipping");
            outcomes.push((
                target.name.clone(),
                TargetOutcome::Resolved {
                    address,
                    newly_deployed: false,
                },
            ));
            continue;
        }

        if let Some(dependency) = target
            .dependencies
            .iter()
            .find(|dep| book.resolved(dep).is_none())
        {
            warn!(
                contract = %target.name,
                dependency = %dependency,
                "skipping target, dependency unresolved"
            );
            outcomes.push((
                target.name.clone(),
                TargetOutcome::DependencyBlocked {
                    dependency: dependency.clone(),
                },
            ));
            continue;
        }

        let outcome = deploy_target(chain, target, book).await;
        if matches!(
            &outcome,
            TargetOutcome::Failed {
                error: ScriptError::ProviderUnavailable(_),
                ..
            }
        ) {
            error!("provider unavailable, aborting remaining deployments");
            aborted = true;
        }
        outcomes.push((target.name.clone(), outcome));
    }

    DeploymentReport { outcomes }
}

/// Deploys a single unresolved target whose dependencies are all resolved
async fn deploy_target<C: ChainClient>(
    chain: &C,
    target: &DeploymentTarget,
    book: &mut AddressBook,
) -> TargetOutcome {
    // A transaction broadcast by a previous run may still be in flight;
    // re-query it by hash rather than broadcasting a duplicate.
    if let Some(tx_hash) = book.pending(&target.name) {
        info!(
            contract = %target.name,
            tx = ?tx_hash,
            "re-querying previously broadcast transaction"
        );
        return confirm(chain, target, tx_hash, book).await;
    }

    let artifact = match read_artifact(&target.artifact_path) {
        Ok(artifact) => artifact,
        Err(error) => {
            error!(contract = %target.name, %error, "failed to read artifact");
            return TargetOutcome::Failed {
                stage: Stage::Artifact,
                error,
            };
        }
    };
    info!(
        contract = %artifact.contract_name,
        constructor = %artifact.constructor_summary,
        "artifact loaded"
    );

    let args = {
        let ctx = ArgContext::new(chain.deployer_address(), book);
        match (target.build_args)(&ctx) {
            Ok(args) => args,
            Err(error) => {
                error!(contract = %target.name, %error, "failed to build constructor arguments");
                return TargetOutcome::Failed {
                    stage: Stage::Broadcast,
                    error,
                };
            }
        }
    };

    let pending = match chain.broadcast_deployment(&artifact, args).await {
        Ok(pending) => pending,
        Err(error) => {
            error!(contract = %target.name, %error, "failed to broadcast deployment");
            return TargetOutcome::Failed {
                stage: Stage::Broadcast,
                error,
            };
        }
    };
    info!(
        contract = %target.name,
        tx = ?pending.tx_hash,
        expected_address = ?pending.expected_address,
        "transaction broadcast"
    );
    book.record_pending(&target.name, pending.tx_hash);
    persist(book);

    confirm(chain, target, pending.tx_hash, book).await
}

/// Waits for the given transaction's confirmation and records the result
async fn confirm<C: ChainClient>(
    chain: &C,
    target: &DeploymentTarget,
    tx_hash: TxHash,
    book: &mut AddressBook,
) -> TargetOutcome {
    match chain.await_confirmation(tx_hash).await {
        Ok(address) => {
            info!(contract = %target.name, address = ?address, "deployment confirmed");
            book.record_resolved(&target.name, address);
            persist(book);
            TargetOutcome::Resolved {
                address,
                newly_deployed: true,
            }
        }
        Err(error) => {
            error!(contract = %target.name, %error, "deployment not confirmed");
            // A reverted transaction is terminal. A timed-out or
            // unreachable one may still land, so its hash is kept for
            // re-query on the next run.
            if matches!(error, ScriptError::TransactionReverted(_)) {
                book.clear_pending(&target.name);
                persist(book);
            }
            TargetOutcome::Failed {
                stage: Stage::Confirmation,
                error,
            }
        }
    }
}

/// Writes the book to its backing file, logging rather than failing the
/// target on error
fn persist(book: &AddressBook) {
    if let Err(error) = book.save() {
        warn!(%error, "failed to persist deployments file");
    }
}
