//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! EndpointBinding (RPC URL, private key, contract address)
//!     → wallet.rs (key parsing, signing identity)
//!     → client.rs (provider with wallet filler, RPC timeouts)
//!     → transaction.rs (receipt polling until final)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All direct RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use transaction::ConfirmationTracker;
pub use types::{BlockchainError, BlockchainResult, ChainId, ConfirmationStatus, EndpointBinding};
pub use wallet::Wallet;
