//! Reading of Hardhat-style compilation artifacts
//!
//! An artifact is a JSON file containing at least the compiled contract's
//! `contractName`, `abi`, and `bytecode` fields. Everything the deploy
//! pipeline needs from the build step is extracted here, up front, so a
//! broken artifact fails before any transaction is broadcast.

use std::{fs, path::Path};

use ethers::{abi::Abi, types::Bytes};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{constants::NO_CONSTRUCTOR_ARGS_SUMMARY, errors::ScriptError};

/// The ABI entry type marking a constructor
const CONSTRUCTOR_ENTRY_TYPE: &str = "constructor";

/// The name and Solidity type of one constructor input, as listed
/// in the artifact's ABI
#[derive(Serialize, Deserialize)]
struct ConstructorInput {
    /// The parameter name
    name: String,
    /// The parameter's Solidity type
    #[serde(rename = "type")]
    kind: String,
}

/// The contents of a compilation artifact, extracted for deployment
#[derive(Debug)]
pub struct ArtifactDescriptor {
    /// The contract's name, as recorded by the compiler
    pub contract_name: String,
    /// The contract's ABI
    pub abi: Abi,
    /// The contract's creation bytecode
    pub bytecode: Bytes,
    /// A human-readable summary of the constructor's declared inputs,
    /// used for logging ahead of the deployment
    pub constructor_summary: String,
}

/// Reads the compilation artifact at the given path
pub fn read_artifact(path: &Path) -> Result<ArtifactDescriptor, ScriptError> {
    if !path.exists() {
        return Err(ScriptError::ArtifactNotFound(path.display().to_string()));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| ScriptError::ArtifactNotFound(format!("{}: {}", path.display(), e)))?;

    parse_artifact(&raw)
}

/// Parses a compilation artifact from its raw JSON contents
pub fn parse_artifact(raw: &str) -> Result<ArtifactDescriptor, ScriptError> {
    let artifact: Value =
        serde_json::from_str(raw).map_err(|e| ScriptError::ArtifactMalformed(e.to_string()))?;

    let contract_name = artifact
        .get("contractName")
        .and_then(Value::as_str)
        .ok_or_else(|| ScriptError::ArtifactMalformed("missing `contractName` field".to_string()))?
        .to_string();

    let bytecode_hex = artifact
        .get("bytecode")
        .and_then(Value::as_str)
        .ok_or_else(|| ScriptError::ArtifactMalformed("missing `bytecode` field".to_string()))?;
    let bytecode = hex::decode(bytecode_hex.trim_start_matches("0x"))
        .map(Bytes::from)
        .map_err(|e| ScriptError::ArtifactMalformed(format!("invalid bytecode hex: {}", e)))?;

    let abi_entries = artifact
        .get("abi")
        .and_then(Value::as_array)
        .ok_or_else(|| ScriptError::ArtifactMalformed("missing `abi` array".to_string()))?;

    let constructor_summary = summarize_constructor(abi_entries)?;

    let abi: Abi = serde_json::from_value(artifact["abi"].clone())
        .map_err(|e| ScriptError::ArtifactMalformed(format!("invalid ABI: {}", e)))?;

    Ok(ArtifactDescriptor {
        contract_name,
        abi,
        bytecode,
        constructor_summary,
    })
}

/// Builds the human-readable constructor summary from the raw ABI entries.
///
/// The ABI must contain at most one constructor entry; none at all yields
/// the fixed [`NO_CONSTRUCTOR_ARGS_SUMMARY`] sentinel. A single entry's
/// inputs are serialized as compact JSON in declaration order.
fn summarize_constructor(abi_entries: &[Value]) -> Result<String, ScriptError> {
    let constructors: Vec<&Value> = abi_entries
        .iter()
        .filter(|entry| {
            entry.get("type").and_then(Value::as_str) == Some(CONSTRUCTOR_ENTRY_TYPE)
        })
        .collect();

    match constructors.as_slice() {
        [] => Ok(NO_CONSTRUCTOR_ARGS_SUMMARY.to_string()),
        [entry] => {
            let inputs: Vec<ConstructorInput> = match entry.get("inputs") {
                Some(inputs) => serde_json::from_value(inputs.clone()).map_err(|e| {
                    ScriptError::ArtifactMalformed(format!("invalid constructor inputs: {}", e))
                })?,
                None => Vec::new(),
            };

            serde_json::to_string(&inputs).map_err(|e| ScriptError::ArtifactMalformed(e.to_string()))
        }
        _ => Err(ScriptError::ArtifactMalformed(
            "multiple constructor entries in ABI".to_string(),
        )),
    }
}
