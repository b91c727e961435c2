//! Transaction confirmation monitoring.
//!
//! # Responsibilities
//! - Poll receipts for a submitted transaction until it is mined
//! - Count confirmations against the configured depth
//! - Bound the wait with an optional timeout
//!
//! No retries: a polling error ends the wait and the caller decides.

use std::time::Duration;

use alloy::primitives::TxHash;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::config::NetworkConfig;

/// Waits for submitted transactions to reach finality.
#[derive(Debug, Clone)]
pub struct ConfirmationTracker {
    client: BlockchainClient,
    required_confirmations: u32,
    poll_interval: Duration,
    max_wait: Option<Duration>,
}

impl ConfirmationTracker {
    /// Create a tracker using the connection's network profile.
    pub fn new(client: BlockchainClient) -> Self {
        let network: &NetworkConfig = client.network();
        let required_confirmations = network.confirmation_blocks.max(1);
        let poll_interval = Duration::from_millis(network.poll_interval_ms.max(1));
        let max_wait = match network.confirmation_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Self {
            client,
            required_confirmations,
            poll_interval,
            max_wait,
        }
    }

    /// Block until `tx_hash` is confirmed or reverted.
    ///
    /// Returns [`ConfirmationStatus::Confirmed`] or
    /// [`ConfirmationStatus::Failed`]. Errors when polling fails or the
    /// configured wait elapses.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<ConfirmationStatus> {
        let wait = self.poll_until_final(tx_hash);

        match self.max_wait {
            Some(limit) => match timeout(limit, wait).await {
                Ok(status) => status,
                Err(_) => {
                    tracing::warn!(tx_hash = %tx_hash, "Confirmation wait timed out");
                    Err(BlockchainError::ConfirmationTimeout(limit.as_secs()))
                }
            },
            None => wait.await,
        }
    }

    async fn poll_until_final(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let status = self.check(tx_hash).await?;
            match status {
                ConfirmationStatus::Pending => {
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                }
                ConfirmationStatus::Confirming { current, required } => {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations = current,
                        required = required,
                        "Waiting for confirmations"
                    );
                }
                final_status => return Ok(final_status),
            }
        }
    }

    /// Single receipt probe.
    pub async fn check(&self, tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
            Some(r) => r,
            None => return Ok(ConfirmationStatus::Pending),
        };

        if !receipt.status() {
            return Ok(ConfirmationStatus::Failed(format!(
                "Transaction {} reverted",
                tx_hash
            )));
        }

        // The inclusion block counts as the first confirmation.
        if self.required_confirmations <= 1 {
            return Ok(ConfirmationStatus::Confirmed {
                block_number: receipt.block_number.unwrap_or_default(),
            });
        }

        let current_block = self.client.get_block_number().await?;
        let tx_block = receipt.block_number.unwrap_or(current_block);
        let confirmations = confirmations_at(tx_block, current_block);

        if confirmations >= self.required_confirmations {
            Ok(ConfirmationStatus::Confirmed {
                block_number: tx_block,
            })
        } else {
            Ok(ConfirmationStatus::Confirming {
                current: confirmations,
                required: self.required_confirmations,
            })
        }
    }

    /// Configured confirmation depth.
    pub fn required_confirmations(&self) -> u32 {
        self.required_confirmations
    }

    /// Configured upper bound on the wait, if any.
    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait
    }
}

fn confirmations_at(tx_block: u64, current_block: u64) -> u32 {
    let depth = current_block.saturating_sub(tx_block).saturating_add(1);
    u32::try_from(depth).unwrap_or(u32::MAX)
}
