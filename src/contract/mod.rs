//! Contract interface and binding.
//!
//! ```text
//! InterfaceDescriptor (built-in ABI or artifact file)
//!     → descriptor.rs (selector and mutability checks)
//!     → binding.rs (typed getMessage / setMessage over the connection)
//!     → MessageContract (what the session drives)
//! ```

use std::future::Future;

use alloy::primitives::TxHash;

use crate::blockchain::types::{BlockchainResult, ConfirmationStatus};

pub mod binding;
pub mod descriptor;

pub use binding::ContractBinding;
pub use descriptor::InterfaceDescriptor;

/// Remote operations the session performs against the message contract.
///
/// [`ContractBinding`] is the network implementation; tests substitute an
/// in-memory ledger.
pub trait MessageContract: Send + Sync {
    /// Read the stored value. Unsigned, no fee.
    fn get_message(&self) -> impl Future<Output = BlockchainResult<String>> + Send;

    /// Sign and broadcast a write. Resolves as soon as the node assigns a
    /// transaction hash.
    fn set_message(&self, message: String) -> impl Future<Output = BlockchainResult<TxHash>> + Send;

    /// Wait until `tx_hash` is confirmed or reverted.
    fn wait_for_finality(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<ConfirmationStatus>> + Send;
}
