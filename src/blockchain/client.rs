//! Connection manager: JSON-RPC provider with a bound signing identity.
//!
//! # Responsibilities
//! - Validate endpoint parameters before anything touches the network
//! - Build an HTTP provider with the wallet attached as transaction filler
//! - Wrap the few direct RPC queries with a per-call timeout
//!
//! `connect` performs no remote call. Chain verification and balance
//! lookups exist for the status probe and must be invoked explicitly.

use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use tokio::time::timeout;

use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, EndpointBinding,
};
use crate::blockchain::wallet::{Wallet, PRIVATE_KEY_ENV_VAR};
use crate::config::{ClientConfig, NetworkConfig};
use crate::error::{ClientError, ClientResult};

impl EndpointBinding {
    /// Assemble a binding from loaded configuration and the private key
    /// held in `HEX_PRIVATE_KEY`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            rpc_url: config.network.rpc_url.clone(),
            private_key: std::env::var(PRIVATE_KEY_ENV_VAR).unwrap_or_default(),
            contract_address: config.contract.address.clone(),
        }
    }

    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("rpc_url", &self.rpc_url),
            ("private_key", &self.private_key),
            ("contract_address", &self.contract_address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Open channel to the ledger, shared by the read and write paths.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    wallet: Wallet,
    contract_address: Address,
    network: NetworkConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Validate `endpoint` and open a provider bound to its signing key.
    ///
    /// Any missing or malformed field yields [`ClientError::Config`]; nothing
    /// is retained on failure.
    pub fn connect(endpoint: &EndpointBinding, network: &NetworkConfig) -> ClientResult<Self> {
        let missing = endpoint.missing_fields();
        if !missing.is_empty() {
            return Err(ClientError::Config(format!(
                "missing required connection parameters: {}",
                missing.join(", ")
            )));
        }

        let rpc_url: url::Url = endpoint.rpc_url.trim().parse().map_err(|e| {
            ClientError::Config(format!("Invalid RPC URL '{}': {}", endpoint.rpc_url, e))
        })?;
        if !matches!(rpc_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "Unsupported RPC URL scheme '{}'",
                rpc_url.scheme()
            )));
        }

        let contract_address: Address = endpoint.contract_address.trim().parse().map_err(|e| {
            ClientError::Config(format!(
                "Invalid contract address '{}': {}",
                endpoint.contract_address, e
            ))
        })?;

        let wallet = Wallet::from_private_key(&endpoint.private_key, network.chain_id)
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.to_ethereum_wallet())
            .connect_http(rpc_url)
            .erased();

        tracing::info!(
            rpc_url = %endpoint.rpc_url,
            chain_id = network.chain_id,
            contract = %contract_address,
            signer = %wallet.address(),
            "Ledger connection established"
        );

        Ok(Self {
            provider,
            wallet,
            contract_address,
            network: network.clone(),
            timeout_duration: Duration::from_secs(network.rpc_timeout_secs),
        })
    }

    async fn call<F, T, E>(&self, op: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{}: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.network.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.network.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    /// Get a transaction receipt by hash. `None` while the transaction is
    /// not yet mined.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// The signing-enabled provider.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// The bound signing identity.
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Contract address taken from the endpoint binding.
    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    /// Network profile this connection was opened with.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Per-call RPC timeout.
    pub fn rpc_timeout(&self) -> Duration {
        self.timeout_duration
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.network.rpc_url)
            .field("chain_id", &self.network.chain_id)
            .field("contract", &self.contract_address)
            .field("signer", &self.wallet.address())
            .finish()
    }
}
