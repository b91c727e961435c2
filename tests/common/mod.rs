//! Shared ledger double for session tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::TxHash;
use tokio::sync::Notify;

use hello_ledger::blockchain::{BlockchainError, BlockchainResult, ConfirmationStatus};
use hello_ledger::MessageContract;

pub const EXPLORER: &str = "https://hashscan.io/testnet/transaction/";

/// What happens when a submitted transaction is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finality {
    Confirm,
    Revert,
    DropConnection,
}

/// In-memory contract. Writes are staged on submission and applied when
/// the confirmation wait succeeds.
pub struct MockLedger {
    value: Mutex<String>,
    staged: Mutex<Option<String>>,
    finality: Mutex<Finality>,
    submission_error: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    reads: AtomicUsize,
    submissions: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockLedger {
    pub fn new(initial: &str) -> Self {
        Self {
            value: Mutex::new(initial.to_string()),
            staged: Mutex::new(None),
            finality: Mutex::new(Finality::Confirm),
            submission_error: Mutex::new(None),
            fail_reads: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Hold every confirmation wait until the returned handle is notified.
    pub fn gated(initial: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let mut ledger = Self::new(initial);
        ledger.gate = Some(gate.clone());
        (ledger, gate)
    }

    pub fn set_finality(&self, finality: Finality) {
        *self.finality.lock().unwrap() = finality;
    }

    pub fn reject_submissions(&self, reason: &str) {
        *self.submission_error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

impl MessageContract for MockLedger {
    async fn get_message(&self) -> BlockchainResult<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BlockchainError::Rpc("connection refused".to_string()));
        }
        Ok(self.stored())
    }

    async fn set_message(&self, message: String) -> BlockchainResult<TxHash> {
        let n = self.submissions.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(reason) = self.submission_error.lock().unwrap().clone() {
            return Err(BlockchainError::Rpc(reason));
        }
        *self.staged.lock().unwrap() = Some(message);
        Ok(TxHash::with_last_byte(n as u8))
    }

    async fn wait_for_finality(&self, _tx_hash: TxHash) -> BlockchainResult<ConfirmationStatus> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let finality = *self.finality.lock().unwrap();
        let staged = self.staged.lock().unwrap().take();
        match finality {
            Finality::Confirm => {
                if let Some(message) = staged {
                    *self.value.lock().unwrap() = message;
                }
                Ok(ConfirmationStatus::Confirmed { block_number: 42 })
            }
            Finality::Revert => Ok(ConfirmationStatus::Failed("execution reverted".to_string())),
            Finality::DropConnection => {
                Err(BlockchainError::Rpc("connection reset by peer".to_string()))
            }
        }
    }
}
