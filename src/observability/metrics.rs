//! Metrics collection.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! embedding process installs a recorder.
//!
//! # Metrics
//! - `hello_ledger_reads_total` (counter): reads by status
//! - `hello_ledger_read_duration_seconds` (histogram)
//! - `hello_ledger_writes_total` (counter): writes by outcome
//! - `hello_ledger_write_duration_seconds` (histogram): submission to
//!   finality, by outcome

use std::time::Duration;

use metrics::{counter, histogram};

const READS_TOTAL: &str = "hello_ledger_reads_total";
const READ_DURATION: &str = "hello_ledger_read_duration_seconds";
const WRITES_TOTAL: &str = "hello_ledger_writes_total";
const WRITE_DURATION: &str = "hello_ledger_write_duration_seconds";

/// How a write ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Finalized successfully.
    Confirmed,
    /// Refused by the node at submission.
    Rejected,
    /// Accepted but reverted, or the wait failed.
    Failed,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Record a completed read.
pub fn record_read(success: bool, elapsed: Duration) {
    let status = if success { "ok" } else { "error" };
    counter!(READS_TOTAL, "status" => status).increment(1);
    histogram!(READ_DURATION).record(elapsed.as_secs_f64());
}

/// Record a finished write.
pub fn record_write(outcome: WriteOutcome, elapsed: Duration) {
    counter!(WRITES_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(WRITE_DURATION, "outcome" => outcome.as_str()).record(elapsed.as_secs_f64());
}
