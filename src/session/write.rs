//! Write path and transaction lifecycle.

use std::time::Instant;

use alloy::primitives::TxHash;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::types::{BlockchainError, ConfirmationStatus};
use crate::contract::MessageContract;
use crate::error::{ClientError, ClientResult};
use crate::observability::metrics::{self, WriteOutcome};
use crate::session::state::{PendingRequest, RequestStatus, WritePhase};
use crate::session::{Session, WriteSlot};

/// Message reported for an empty or all-whitespace payload.
pub const EMPTY_MESSAGE_ERROR: &str = "message cannot be empty";

impl<C: MessageContract> Session<C> {
    /// Write `new_value` and wait until it is final.
    ///
    /// The value is trimmed first; an empty result never reaches the network.
    /// While another write is in flight this returns
    /// [`ClientError::WriteInFlight`] and changes nothing. On success the
    /// freshly read ledger value is returned and a draft holding the same
    /// message is cleared.
    ///
    /// If the write finalizes but the read-back fails, the read's
    /// [`ClientError::RemoteCall`] is returned while `last_status` already
    /// records [`RequestStatus::Confirmed`].
    pub async fn submit_update(&self, new_value: &str) -> ClientResult<String> {
        let Some(_slot) = WriteSlot::acquire(&self.write_slot, &self.state) else {
            tracing::warn!("Write rejected: another write is in flight");
            return Err(ClientError::WriteInFlight);
        };

        let message = new_value.trim();
        if message.is_empty() {
            let err = ClientError::Validation(EMPTY_MESSAGE_ERROR.to_string());
            self.update(|s| s.error = Some(err.to_string()));
            return Err(err);
        }

        let span = tracing::info_span!("submit_update", op_id = %Uuid::new_v4());
        self.run_write(message.to_string()).instrument(span).await
    }

    /// Submit the current draft.
    pub async fn submit_draft(&self) -> ClientResult<String> {
        let draft = self.state.borrow().draft.clone();
        self.submit_update(&draft).await
    }

    async fn run_write(&self, message: String) -> ClientResult<String> {
        let _op = self.begin_operation();
        let started = Instant::now();

        self.update(|s| {
            s.phase = WritePhase::Submitting;
            s.error = None;
            s.transaction_id = None;
            s.last_status = None;
            s.pending = Some(PendingRequest::new());
        });
        tracing::info!(message = %message, "Submitting transaction");

        let tx_hash = match self.contract.set_message(message.clone()).await {
            Ok(hash) => hash,
            Err(e) => {
                let err = ClientError::Submission(e);
                self.finish_failed(&err);
                metrics::record_write(WriteOutcome::Rejected, started.elapsed());
                return Err(err);
            }
        };

        tracing::info!(tx_hash = %tx_hash, "Transaction submitted");
        self.update(|s| {
            s.phase = WritePhase::Pending;
            s.transaction_id = Some(tx_hash);
            if let Some(pending) = s.pending.as_mut() {
                pending.tx_hash = Some(tx_hash);
            }
        });

        let block_number = match self.await_finality(tx_hash).await {
            Ok(block_number) => block_number,
            Err(err) => {
                self.finish_failed(&err);
                metrics::record_write(WriteOutcome::Failed, started.elapsed());
                return Err(err);
            }
        };

        tracing::info!(tx_hash = %tx_hash, block_number, "Transaction confirmed");
        metrics::record_write(WriteOutcome::Confirmed, started.elapsed());
        self.update(|s| {
            s.phase = WritePhase::Confirmed;
            s.last_status = Some(RequestStatus::Confirmed);
            if let Some(pending) = s.pending.as_mut() {
                pending.status = RequestStatus::Confirmed;
            }
        });

        let reconciled = self.load_value().await;

        self.update(|s| {
            if s.draft.trim() == message {
                s.draft.clear();
            }
            s.pending = None;
            s.phase = WritePhase::Idle;
        });
        reconciled
    }

    async fn await_finality(&self, tx_hash: TxHash) -> ClientResult<u64> {
        let source = match self.contract.wait_for_finality(tx_hash).await {
            Ok(ConfirmationStatus::Confirmed { block_number }) => return Ok(block_number),
            Ok(ConfirmationStatus::Failed(reason)) => {
                tracing::warn!(tx_hash = %tx_hash, reason = %reason, "Transaction failed on-chain");
                BlockchainError::Reverted(tx_hash)
            }
            Ok(status) => {
                BlockchainError::Rpc(format!("wait ended before finality: {:?}", status))
            }
            Err(e) => e,
        };
        Err(ClientError::Confirmation { tx_hash, source })
    }

    fn finish_failed(&self, err: &ClientError) {
        tracing::warn!(error = %err, "Write failed");
        let message = err.to_string();
        self.update(|s| {
            s.phase = WritePhase::Failed;
            s.error = Some(message);
            s.last_status = Some(RequestStatus::Failed);
            if let Some(pending) = s.pending.as_mut() {
                pending.status = RequestStatus::Failed;
            }
        });
        self.update(|s| {
            s.pending = None;
            s.phase = WritePhase::Idle;
        });
    }
}
