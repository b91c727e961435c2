//! Observable session state.
//!
//! A plain record published through a `watch` channel. Consumers read
//! snapshots; only the session mutates it.

use std::time::SystemTime;

use alloy::primitives::TxHash;

/// Where the write lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePhase {
    #[default]
    Idle,
    /// Request is being signed and broadcast.
    Submitting,
    /// Node accepted the request; waiting for finality.
    Pending,
    Confirmed,
    Failed,
}

/// Confirmation status of a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Submitted,
    Confirmed,
    Failed,
}

/// The single in-flight write, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub submitted_at: SystemTime,
    /// Assigned by the network; `None` until the node accepts the request.
    pub tx_hash: Option<TxHash>,
    pub status: RequestStatus,
}

impl PendingRequest {
    pub(crate) fn new() -> Self {
        Self {
            submitted_at: SystemTime::now(),
            tx_hash: None,
            status: RequestStatus::Submitted,
        }
    }
}

/// Everything a presentation layer or CLI needs to render the session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: WritePhase,
    /// Last value observed on the ledger.
    pub current_value: Option<String>,
    /// Last error, cleared when the next operation starts.
    pub error: Option<String>,
    /// Hash of the most recent write attempt. Survives success and failure;
    /// cleared only when the next submission begins.
    pub transaction_id: Option<TxHash>,
    pub in_progress: bool,
    /// Set once the session has a bound contract; false before that and
    /// after a failed establish.
    pub connected: bool,
    /// Editable input awaiting submission.
    pub draft: String,
    pub pending: Option<PendingRequest>,
    /// Outcome of the most recent finished write.
    pub last_status: Option<RequestStatus>,
    active_operations: usize,
}

impl SessionState {
    /// Error message, or an empty string when there is none.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }

    pub(crate) fn enter_operation(&mut self) {
        self.active_operations += 1;
        self.in_progress = true;
    }

    pub(crate) fn leave_operation(&mut self) {
        self.active_operations = self.active_operations.saturating_sub(1);
        self.in_progress = self.active_operations > 0;
    }
}

/// Explorer URL for `tx_hash` under `prefix`.
pub fn explorer_link(prefix: &str, tx_hash: &TxHash) -> String {
    format!("{}{}", prefix, tx_hash)
}
