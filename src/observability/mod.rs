//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! session, blockchain, contract
//!     → logging.rs (structured log events, operation spans)
//!     → metrics.rs (read/write counters and latencies)
//! ```

pub mod logging;
pub mod metrics;
