//! Network configuration for the deploy scripts
//!
//! Each recognized network is enumerated explicitly with its RPC endpoint,
//! gas price, and any contracts known to be deployed there already. The
//! configuration is resolved once and injected into the pipeline.

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};

use clap::ValueEnum;
use ethers::types::{Address, U256};

use crate::constants::{
    BSC_GAS_PRICE, DEVELOP_RPC_URL, MAINNET_RPC_URL, MOLOCH_CONTRACT_KEY, TESTNET_MOLOCH_ADDRESS,
    TESTNET_RPC_URL, TESTNET_TOKEN_ADDRESS, TOKEN_CONTRACT_KEY,
};

/// The networks the scripts know how to deploy to
#[derive(ValueEnum, Copy, Clone)]
pub enum Network {
    /// A local development node
    Develop,
    /// The BSC testnet
    Testnet,
    /// BSC mainnet
    Mainnet,
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Develop => write!(f, "develop"),
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

/// The deployment configuration of a single network
pub struct NetworkConfig {
    /// The network this configuration describes
    pub network: Network,
    /// The RPC endpoint to connect to
    pub rpc_url: String,
    /// The gas price to use for deployment transactions, if the
    /// network calls for a fixed one
    pub gas_price: Option<U256>,
    /// Contracts known to be deployed to this network already,
    /// keyed by their deployments-file key
    pub known_addresses: BTreeMap<String, Address>,
}

impl NetworkConfig {
    /// Returns the configuration of the given network
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Develop => NetworkConfig {
                network,
                rpc_url: DEVELOP_RPC_URL.to_string(),
                gas_price: None,
                known_addresses: BTreeMap::new(),
            },
            Network::Testnet => NetworkConfig {
                network,
                rpc_url: TESTNET_RPC_URL.to_string(),
                gas_price: Some(U256::from(BSC_GAS_PRICE)),
                known_addresses: BTreeMap::from([
                    // Can `unwrap` here since the address constants are known-valid hex
                    (
                        TOKEN_CONTRACT_KEY.to_string(),
                        Address::from_str(TESTNET_TOKEN_ADDRESS).unwrap(),
                    ),
                    (
                        MOLOCH_CONTRACT_KEY.to_string(),
                        Address::from_str(TESTNET_MOLOCH_ADDRESS).unwrap(),
                    ),
                ]),
            },
            Network::Mainnet => NetworkConfig {
                network,
                rpc_url: MAINNET_RPC_URL.to_string(),
                gas_price: Some(U256::from(BSC_GAS_PRICE)),
                known_addresses: BTreeMap::new(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use super::{Network, NetworkConfig};
    use crate::constants::{MOLOCH_CONTRACT_KEY, TOKEN_CONTRACT_KEY};

    #[test]
    fn develop_has_no_known_addresses() {
        let config = NetworkConfig::for_network(Network::Develop);
        assert!(config.known_addresses.is_empty());
        assert!(config.gas_price.is_none());
    }

    #[test]
    fn testnet_knows_the_predeployed_contracts() {
        let config = NetworkConfig::for_network(Network::Testnet);
        assert!(config.known_addresses.contains_key(TOKEN_CONTRACT_KEY));
        assert!(config.known_addresses.contains_key(MOLOCH_CONTRACT_KEY));
        assert!(config.gas_price.is_some());
    }
}
