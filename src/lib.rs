//! Client for a single owner-settable string stored in a ledger contract.
//!
//! ```text
//! config ─▶ blockchain::BlockchainClient ─▶ contract::ContractBinding ─▶ session::Session
//!                (connect, no I/O)             (typed calls)              (read path, write lifecycle)
//! ```

pub mod blockchain;
pub mod config;
pub mod contract;
pub mod error;
pub mod observability;
pub mod session;

pub use blockchain::EndpointBinding;
pub use config::ClientConfig;
pub use contract::{ContractBinding, InterfaceDescriptor, MessageContract};
pub use error::{ClientError, ClientResult};
pub use session::{Session, SessionState, WritePhase};
