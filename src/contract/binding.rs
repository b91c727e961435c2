//! Typed binding to the deployed message contract.

use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::providers::DynProvider;
use alloy::sol;
use tokio::time::timeout;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::ConfirmationTracker;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::contract::descriptor::InterfaceDescriptor;
use crate::contract::MessageContract;
use crate::error::ClientResult;

sol! {
    /// Single owner-settable string.
    #[sol(rpc)]
    contract HelloHedera {
        function getMessage() external view returns (string memory);
        function setMessage(string memory newMessage) external;
    }
}

/// The contract at a fixed address, reached through a shared connection.
pub struct ContractBinding {
    instance: HelloHedera::HelloHederaInstance<DynProvider>,
    tracker: ConfirmationTracker,
    rpc_timeout: Duration,
}

impl ContractBinding {
    /// Bind `address` on `client` using a validated descriptor.
    ///
    /// No I/O. The descriptor is checked against the typed calls when it is
    /// loaded.
    pub fn bind(
        client: &BlockchainClient,
        descriptor: &InterfaceDescriptor,
        address: Address,
    ) -> ClientResult<Self> {
        tracing::debug!(
            contract = %address,
            functions = descriptor.abi().functions.len(),
            "Contract bound"
        );

        Ok(Self {
            instance: HelloHedera::new(address, client.provider().clone()),
            tracker: ConfirmationTracker::new(client.clone()),
            rpc_timeout: client.rpc_timeout(),
        })
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    fn timed_out(&self) -> BlockchainError {
        BlockchainError::Timeout(self.rpc_timeout.as_secs())
    }
}

fn classify(err: alloy::contract::Error) -> BlockchainError {
    match err {
        alloy::contract::Error::TransportError(e) => BlockchainError::Rpc(e.to_string()),
        other => BlockchainError::Contract(other.to_string()),
    }
}

impl MessageContract for ContractBinding {
    async fn get_message(&self) -> BlockchainResult<String> {
        let call = self.instance.getMessage();
        match timeout(self.rpc_timeout, call.call()).await {
            Ok(result) => result.map_err(classify),
            Err(_) => Err(self.timed_out()),
        }
    }

    async fn set_message(&self, message: String) -> BlockchainResult<TxHash> {
        let call = self.instance.setMessage(message);
        match timeout(self.rpc_timeout, call.send()).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(self.timed_out()),
        }
    }

    async fn wait_for_finality(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        self.tracker.wait_for_confirmation(tx_hash).await
    }
}
