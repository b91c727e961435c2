//! Client-level error taxonomy.
//!
//! Each variant names the operation boundary where the failure surfaced.
//! Low-level [`BlockchainError`]s are wrapped by whichever path initiated
//! the remote call, so the same RPC failure reads differently depending on
//! whether it happened during a read, a submission, or a confirmation wait.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::types::BlockchainError;
use crate::config::ConfigError;

/// Errors surfaced by the session and its collaborators.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required connection parameters are missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The interface descriptor does not describe the expected operations.
    #[error("interface descriptor error: {0}")]
    Schema(String),

    /// User-supplied payload rejected before reaching the network.
    #[error("{0}")]
    Validation(String),

    /// A read against the ledger failed.
    #[error("read failed: {0}")]
    RemoteCall(#[source] BlockchainError),

    /// The node refused the transaction at submission time.
    #[error("submission rejected: {0}")]
    Submission(#[source] BlockchainError),

    /// The transaction was accepted but did not finalize successfully.
    #[error("transaction {tx_hash} failed: {source}")]
    Confirmation {
        tx_hash: TxHash,
        source: BlockchainError,
    },

    /// A write is already pending in this session.
    #[error("a write is already in flight")]
    WriteInFlight,
}

impl ClientError {
    /// Whether the error leaves the session unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Schema(_))
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ClientError::Config("missing".into()).is_fatal());
        assert!(ClientError::Schema("missing".into()).is_fatal());
        assert!(!ClientError::Validation("empty".into()).is_fatal());
        assert!(!ClientError::WriteInFlight.is_fatal());
        assert!(!ClientError::RemoteCall(BlockchainError::Timeout(5)).is_fatal());
    }

    #[test]
    fn test_confirmation_error_mentions_hash() {
        let err = ClientError::Confirmation {
            tx_hash: TxHash::ZERO,
            source: BlockchainError::Rpc("connection reset".into()),
        };
        let rendered = err.to_string();
        assert!(rendered.contains(&TxHash::ZERO.to_string()));
        assert!(rendered.contains("connection reset"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
