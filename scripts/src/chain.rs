//! The chain-facing half of the deploy pipeline
//!
//! [`ChainClient`] is the seam between the orchestrator and the network:
//! broadcasting a contract-creation transaction and waiting (with a bounded
//! window) for its confirmation. [`EthersChain`] is the production
//! implementation over an ethers [`Middleware`]; the orchestrator's tests
//! substitute a scripted mock.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use ethers::{
    abi::Token,
    contract::ContractFactory,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{coins_bip39::English, MnemonicBuilder, Signer},
    types::{Address, TransactionReceipt, TxHash, U256, U64},
    utils::get_contract_address,
};
use tokio::time::{sleep, timeout};

use crate::{
    artifacts::ArtifactDescriptor,
    config::NetworkConfig,
    constants::{CONFIRMATION_TIMEOUT_SECS, RECEIPT_POLL_INTERVAL_MS},
    errors::ScriptError,
};

/// A contract-creation transaction that has been broadcast but whose
/// confirmation has not yet been observed
pub struct PendingDeployment {
    /// The hash of the broadcast transaction
    pub tx_hash: TxHash,
    /// The address the contract will live at if the transaction confirms,
    /// derived from the deployer address and its nonce at broadcast time
    pub expected_address: Address,
}

/// The operations the orchestrator needs from the chain
#[async_trait]
pub trait ChainClient {
    /// The address of the funded deployer wallet
    fn deployer_address(&self) -> Address;

    /// Broadcasts a contract-creation transaction for the given artifact
    /// and constructor arguments.
    ///
    /// Broadcasting is not idempotent: calling this twice creates two
    /// contract instances. The orchestrator's address book is the
    /// idempotence boundary.
    async fn broadcast_deployment(
        &self,
        artifact: &ArtifactDescriptor,
        args: Vec<Token>,
    ) -> Result<PendingDeployment, ScriptError>;

    /// Suspends until the given transaction is mined, returning the deployed
    /// contract's address
    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Address, ScriptError>;
}

/// Sets up the client with which to broadcast deployment transactions,
/// deriving the deployer wallet from its mnemonic
pub async fn setup_client(
    mnemonic: &str,
    rpc_url: &str,
) -> Result<Arc<impl Middleware>, ScriptError> {
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = MnemonicBuilder::<English>::default()
        .phrase(mnemonic)
        .build()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();
    let client = Arc::new(SignerMiddleware::new(provider, wallet.with_chain_id(chain_id)));

    Ok(client)
}

/// Computes the address a contract will be deployed to, given the deployer
/// address and that deployer's transaction nonce at broadcast time
pub fn expected_contract_address(deployer: Address, nonce: U256) -> Address {
    get_contract_address(deployer, nonce)
}

/// The production [`ChainClient`] over an ethers middleware stack
pub struct EthersChain<M: Middleware> {
    /// The underlying RPC client, with the deployer wallet attached
    client: Arc<M>,
    /// The deployer wallet's address
    deployer: Address,
    /// A fixed gas price to apply to deployment transactions, if the
    /// network configuration calls for one
    gas_price: Option<U256>,
    /// The interval at which to poll for transaction receipts
    poll_interval: Duration,
    /// The bounded window to wait for a confirmation
    confirmation_timeout: Duration,
}

impl<M: Middleware> EthersChain<M> {
    /// Creates a chain client over the given middleware, configured for the
    /// given network
    pub fn new(client: Arc<M>, config: &NetworkConfig) -> Result<Self, ScriptError> {
        let deployer = client.default_sender().ok_or_else(|| {
            ScriptError::ClientInitialization("client does not have a sender attached".to_string())
        })?;

        Ok(EthersChain {
            client,
            deployer,
            gas_price: config.gas_price,
            poll_interval: Duration::from_millis(RECEIPT_POLL_INTERVAL_MS),
            confirmation_timeout: Duration::from_secs(CONFIRMATION_TIMEOUT_SECS),
        })
    }
}

#[async_trait]
impl<M: Middleware> ChainClient for EthersChain<M> {
    fn deployer_address(&self) -> Address {
        self.deployer
    }

    async fn broadcast_deployment(
        &self,
        artifact: &ArtifactDescriptor,
        args: Vec<Token>,
    ) -> Result<PendingDeployment, ScriptError> {
        let factory = ContractFactory::new(
            artifact.abi.clone(),
            artifact.bytecode.clone(),
            self.client.clone(),
        );
        // Argument/ABI mismatches surface here, from the encoding layer
        let mut deployer = factory
            .deploy_tokens(args)
            .map_err(|e| ScriptError::ArgumentMismatch(e.to_string()))?;
        if let Some(gas_price) = self.gas_price {
            deployer.tx.set_gas_price(gas_price);
        }

        let nonce = self
            .client
            .get_transaction_count(self.deployer, None /* block */)
            .await
            .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;
        let expected_address = expected_contract_address(self.deployer, nonce);

        let pending = self
            .client
            .send_transaction(deployer.tx, None /* block */)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
        let tx_hash = *pending;

        Ok(PendingDeployment {
            tx_hash,
            expected_address,
        })
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> Result<Address, ScriptError> {
        let poll = async {
            loop {
                match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt_address(receipt),
                    Ok(None) => sleep(self.poll_interval).await,
                    Err(e) => return Err(ScriptError::ProviderUnavailable(e.to_string())),
                }
            }
        };

        match timeout(self.confirmation_timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(ScriptError::TransactionTimeout(format!("{:#x}", tx_hash))),
        }
    }
}

/// Extracts the deployed contract's address from a confirmation receipt
fn receipt_address(receipt: TransactionReceipt) -> Result<Address, ScriptError> {
    if receipt.status == Some(U64::zero()) {
        return Err(ScriptError::TransactionReverted(format!(
            "{:#x}",
            receipt.transaction_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment("confirmation receipt carries no contract address".to_string())
    })
}

#[cfg(test)]
#[allow(clippy::missing_docs_in_private_items)]
mod tests {
    use std::str::FromStr;

    use ethers::types::{Address, TransactionReceipt, U256, U64};

    use super::{expected_contract_address, receipt_address};
    use crate::errors::ScriptError;

    #[test]
    fn contract_address_derivation_matches_known_vector() {
        // The first contract deployed by the standard dev account
        let deployer = Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let expected =
            Address::from_str("0x5FbDB2315678afecb367f032d93F642f64180aa3").unwrap();
        assert_eq!(expected_contract_address(deployer, U256::zero()), expected);
    }

    #[test]
    fn reverted_receipt_is_surfaced() {
        let receipt = TransactionReceipt {
            status: Some(U64::zero()),
            contract_address: Some(Address::from_low_u64_be(1)),
            ..Default::default()
        };
        let err = receipt_address(receipt).unwrap_err();
        assert!(matches!(err, ScriptError::TransactionReverted(_)));
    }

    #[test]
    fn successful_receipt_yields_the_contract_address() {
        let address = Address::from_low_u64_be(7);
        let receipt = TransactionReceipt {
            status: Some(U64::one()),
            contract_address: Some(address),
            ..Default::default()
        };
        assert_eq!(receipt_address(receipt).unwrap(), address);
    }
}
