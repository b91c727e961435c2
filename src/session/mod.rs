//! Interaction session: one connection, one contract binding, one
//! observable state record.
//!
//! # Data Flow
//! ```text
//! Session::establish (connect + bind, no remote call, flips `connected`)
//!     → read.rs   load_value      (eth_call, refreshes current_value)
//!     → write.rs  submit_update   (Idle → Submitting → Pending → Confirmed | Failed → Idle)
//!                     └─ on Confirmed: load_value again
//! ```
//!
//! # Design Decisions
//! - State lives in a `watch` channel so callers can observe the
//!   transaction hash before confirmation
//! - The in-progress flag and the write slot are released by drop guards,
//!   so every exit path (including a dropped future) resets them
//! - At most one write at a time; concurrent reads are fine

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::EndpointBinding;
use crate::config::ClientConfig;
use crate::contract::{ContractBinding, InterfaceDescriptor, MessageContract};
use crate::error::ClientResult;

mod read;
pub mod state;
mod write;

pub use state::{explorer_link, PendingRequest, RequestStatus, SessionState, WritePhase};
pub use write::EMPTY_MESSAGE_ERROR;

/// A live session against one contract.
pub struct Session<C> {
    contract: C,
    state: watch::Sender<SessionState>,
    write_slot: AtomicBool,
    explorer_tx_url: String,
}

impl Session<ContractBinding> {
    /// Connect to the ledger and bind the configured contract.
    ///
    /// Fails with a configuration or schema error; nothing is left open on
    /// failure and no remote call is made.
    pub fn establish(config: &ClientConfig, endpoint: &EndpointBinding) -> ClientResult<Self> {
        let (state, _) = watch::channel(SessionState::default());
        Self::establish_with(config, endpoint, state)
    }

    /// Like [`Session::establish`], publishing into a state channel the
    /// caller already observes.
    ///
    /// The state flips to connected only once the binding exists. On failure
    /// it stays disconnected and carries the error, and the sender is
    /// dropped so receivers keep that final state.
    pub fn establish_with(
        config: &ClientConfig,
        endpoint: &EndpointBinding,
        state: watch::Sender<SessionState>,
    ) -> ClientResult<Self> {
        match connect_and_bind(config, endpoint) {
            Ok(binding) => Ok(Self::with_state(
                binding,
                config.network.explorer_tx_url.clone(),
                state,
            )),
            Err(e) => {
                tracing::error!(error = %e, "Session initialization failed");
                let message = e.to_string();
                state.send_modify(|s| {
                    s.connected = false;
                    s.error = Some(message);
                });
                Err(e)
            }
        }
    }
}

fn connect_and_bind(
    config: &ClientConfig,
    endpoint: &EndpointBinding,
) -> ClientResult<ContractBinding> {
    let client = BlockchainClient::connect(endpoint, &config.network)?;
    let descriptor = match &config.contract.abi_path {
        Some(path) => InterfaceDescriptor::from_path(Path::new(path))?,
        None => InterfaceDescriptor::builtin()?,
    };
    ContractBinding::bind(&client, &descriptor, client.contract_address())
}

impl<C: MessageContract> Session<C> {
    /// Wrap an already bound contract.
    pub fn new(contract: C, explorer_tx_url: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self::with_state(contract, explorer_tx_url, state)
    }

    /// Wrap an already bound contract and mark `state` connected.
    pub fn with_state(
        contract: C,
        explorer_tx_url: impl Into<String>,
        state: watch::Sender<SessionState>,
    ) -> Self {
        state.send_modify(|s| {
            s.connected = true;
            s.error = None;
        });
        Self {
            contract,
            state,
            write_slot: AtomicBool::new(false),
            explorer_tx_url: explorer_tx_url.into(),
        }
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Replace the editable input. Ignored while a write is pending;
    /// returns whether the draft was taken.
    pub fn set_draft(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        let mut accepted = false;
        self.state.send_if_modified(|s| {
            if s.pending.is_some() {
                return false;
            }
            s.draft = text;
            accepted = true;
            true
        });
        accepted
    }

    /// Explicitly clear the error message.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Explorer link for the most recent write attempt.
    pub fn explorer_link(&self) -> Option<String> {
        self.state
            .borrow()
            .transaction_id
            .map(|hash| explorer_link(&self.explorer_tx_url, &hash))
    }

    /// The bound contract.
    pub fn contract(&self) -> &C {
        &self.contract
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.state.send_modify(f);
    }

    fn begin_operation(&self) -> OperationGuard<'_> {
        self.update(SessionState::enter_operation);
        OperationGuard { state: &self.state }
    }
}

/// Keeps `in_progress` raised while alive.
struct OperationGuard<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(SessionState::leave_operation);
    }
}

/// Exclusive right to run a write. Dropping it returns the lifecycle to
/// Idle if the write did not get there itself.
struct WriteSlot<'a> {
    flag: &'a AtomicBool,
    state: &'a watch::Sender<SessionState>,
}

impl<'a> WriteSlot<'a> {
    fn acquire(flag: &'a AtomicBool, state: &'a watch::Sender<SessionState>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag, state })
    }
}

impl Drop for WriteSlot<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if s.phase == WritePhase::Idle && s.pending.is_none() {
                return false;
            }
            s.phase = WritePhase::Idle;
            s.pending = None;
            true
        });
        self.flag.store(false, Ordering::Release);
    }
}
