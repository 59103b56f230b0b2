//! The address-resolution table backing a deployment run
//!
//! The [`AddressBook`] records which contracts are already deployed (and at
//! what address) and which have a broadcast-but-unconfirmed transaction
//! outstanding. It is owned by the caller of the orchestrator and persisted
//! to a `deployments.json` file between runs, which is what makes re-running
//! the pipeline idempotent.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::errors::ScriptError;

/// The on-disk form of the deployments file
#[derive(Default, Serialize, Deserialize)]
struct DeploymentsFile {
    /// Contract key -> deployed address
    #[serde(default)]
    deployments: BTreeMap<String, Address>,
    /// Contract key -> hash of a broadcast transaction whose
    /// confirmation has not yet been observed
    #[serde(default)]
    pending_transactions: BTreeMap<String, TxHash>,
}

/// The address-resolution table for a deployment run
pub struct AddressBook {
    /// The file backing this book, if any
    path: Option<PathBuf>,
    /// Resolved contract addresses
    resolved: BTreeMap<String, Address>,
    /// Outstanding deployment transaction hashes
    pending: BTreeMap<String, TxHash>,
}

impl AddressBook {
    /// Creates an empty book with no backing file
    pub fn in_memory() -> Self {
        AddressBook {
            path: None,
            resolved: BTreeMap::new(),
            pending: BTreeMap::new(),
        }
    }

    /// Loads the book from the deployments file at the given path.
    ///
    /// A missing file yields an empty book; it is created on the first save.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let file = if path.exists() {
            let raw = fs::read_to_string(path)
                .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;
            serde_json::from_str::<DeploymentsFile>(&raw)
                .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
        } else {
            DeploymentsFile::default()
        };

        Ok(AddressBook {
            path: Some(path.to_path_buf()),
            resolved: file.deployments,
            pending: file.pending_transactions,
        })
    }

    /// Seeds the book with known pre-deployed addresses from the network
    /// configuration.
    ///
    /// Addresses already recorded in the deployments file take precedence,
    /// and the all-zero sentinel address never counts as deployed.
    pub fn with_known_addresses(mut self, known: &BTreeMap<String, Address>) -> Self {
        for (name, address) in known {
            if address.is_zero() {
                continue;
            }
            self.resolved.entry(name.clone()).or_insert(*address);
        }
        self
    }

    /// Returns the resolved address of the given contract, if any
    pub fn resolved(&self, name: &str) -> Option<Address> {
        self.resolved.get(name).copied().filter(|a| !a.is_zero())
    }

    /// Returns the outstanding deployment transaction hash for the given
    /// contract, if any
    pub fn pending(&self, name: &str) -> Option<TxHash> {
        self.pending.get(name).copied()
    }

    /// Records the given contract as deployed at the given address,
    /// clearing any outstanding transaction hash
    pub fn record_resolved(&mut self, name: &str, address: Address) {
        self.pending.remove(name);
        self.resolved.insert(name.to_string(), address);
    }

    /// Records an outstanding deployment transaction for the given contract
    pub fn record_pending(&mut self, name: &str, tx_hash: TxHash) {
        self.pending.insert(name.to_string(), tx_hash);
    }

    /// Clears the outstanding deployment transaction for the given contract
    pub fn clear_pending(&mut self, name: &str) {
        self.pending.remove(name);
    }

    /// Writes the book back to its backing file, if it has one
    pub fn save(&self) -> Result<(), ScriptError> {
        let path = match &self.path {
            Some(path) => path,
            None => return Ok(()),
        };

        let file = DeploymentsFile {
            deployments: self.resolved.clone(),
            pending_transactions: self.pending.clone(),
        };
        let raw = serde_json::to_string_pretty(&file)
            .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

        fs::write(path, raw).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use std::collections::BTreeMap;

    use ethers::types::{Address, TxHash};

    use super::AddressBook;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("moloch-deployments-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_loads_empty() {
        let book = AddressBook::load(&temp_path("missing")).unwrap();
        assert!(book.resolved("token_contract").is_none());
        assert!(book.pending("token_contract").is_none());
    }

    #[test]
    fn save_and_reload_round_trips() {
        let path = temp_path("round-trip");
        let mut book = AddressBook::load(&path).unwrap();

        let address = Address::from_low_u64_be(42);
        let tx_hash = TxHash::from_low_u64_be(7);
        book.record_resolved("token_contract", address);
        book.record_pending("moloch_contract", tx_hash);
        book.save().unwrap();

        let reloaded = AddressBook::load(&path).unwrap();
        assert_eq!(reloaded.resolved("token_contract"), Some(address));
        assert_eq!(reloaded.pending("moloch_contract"), Some(tx_hash));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn zero_address_is_not_resolved() {
        let mut known = BTreeMap::new();
        known.insert("token_contract".to_string(), Address::zero());
        let book = AddressBook::in_memory().with_known_addresses(&known);
        assert!(book.resolved("token_contract").is_none());
    }

    #[test]
    fn file_entries_take_precedence_over_known_addresses() {
        let mut book = AddressBook::in_memory();
        let deployed = Address::from_low_u64_be(1);
        book.record_resolved("token_contract", deployed);

        let mut known = BTreeMap::new();
        known.insert("token_contract".to_string(), Address::from_low_u64_be(2));
        let book = book.with_known_addresses(&known);

        assert_eq!(book.resolved("token_contract"), Some(deployed));
    }

    #[test]
    fn resolving_clears_the_pending_hash() {
        let mut book = AddressBook::in_memory();
        book.record_pending("token_contract", TxHash::from_low_u64_be(1));
        book.record_resolved("token_contract", Address::from_low_u64_be(9));
        assert!(book.pending("token_contract").is_none());
    }
}
