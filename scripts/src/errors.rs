//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// The compilation artifact file does not exist
    ArtifactNotFound(String),
    /// The compilation artifact is not well-formed JSON,
    /// or lacks a required field
    ArtifactMalformed(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error fetching the nonce of the deployer
    NonceFetching(String),
    /// The constructor arguments do not match the ABI's declared inputs,
    /// as surfaced by the encoding layer
    ArgumentMismatch(String),
    /// Error broadcasting a contract-creation transaction
    ContractDeployment(String),
    /// The deployment transaction was mined but reverted on-chain
    TransactionReverted(String),
    /// No confirmation arrived within the bounded wait window.
    /// The transaction may still confirm later; its hash is retained
    /// for re-query on the next run.
    TransactionTimeout(String),
    /// The network connection dropped mid-wait
    ProviderUnavailable(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
    /// One or more targets did not resolve during a `deploy-all` run
    IncompleteDeployment(usize),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ArtifactNotFound(s) => write!(f, "artifact not found: {}", s),
            ScriptError::ArtifactMalformed(s) => write!(f, "malformed artifact: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::NonceFetching(s) => write!(f, "error fetching nonce: {}", s),
            ScriptError::ArgumentMismatch(s) => {
                write!(f, "constructor argument mismatch: {}", s)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::TransactionReverted(s) => write!(f, "transaction reverted: {}", s),
            ScriptError::TransactionTimeout(s) => {
                write!(f, "no confirmation within wait window for tx: {}", s)
            }
            ScriptError::ProviderUnavailable(s) => write!(f, "provider unavailable: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::IncompleteDeployment(n) => {
                write!(f, "{} contract(s) did not resolve", n)
            }
        }
    }
}

impl Error for ScriptError {}
