//! Read path: refresh the cached value from the ledger.

use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use crate::contract::MessageContract;
use crate::error::{ClientError, ClientResult};
use crate::observability::metrics;
use crate::session::Session;

impl<C: MessageContract> Session<C> {
    /// Fetch the current value.
    ///
    /// On failure the previous value is kept and the error is recorded in
    /// the session state. Safe to call at any time, including while a write
    /// is pending.
    pub async fn load_value(&self) -> ClientResult<String> {
        let span = tracing::info_span!("load_value", op_id = %Uuid::new_v4());
        self.read_current().instrument(span).await
    }

    async fn read_current(&self) -> ClientResult<String> {
        let _op = self.begin_operation();
        self.update(|s| s.error = None);

        let started = Instant::now();
        match self.contract.get_message().await {
            Ok(value) => {
                metrics::record_read(true, started.elapsed());
                tracing::info!(value = %value, "Current value loaded");
                let cached = value.clone();
                self.update(|s| s.current_value = Some(cached));
                Ok(value)
            }
            Err(e) => {
                metrics::record_read(false, started.elapsed());
                let err = ClientError::RemoteCall(e);
                tracing::warn!(error = %err, "Read failed, keeping previous value");
                let message = err.to_string();
                self.update(|s| s.error = Some(message));
                Err(err)
            }
        }
    }
}
