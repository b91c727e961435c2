//! End-to-end session behavior against the in-memory ledger.

use std::sync::Arc;

use tokio::sync::watch;

use hello_ledger::blockchain::EndpointBinding;
use hello_ledger::session::{RequestStatus, EMPTY_MESSAGE_ERROR};
use hello_ledger::{ClientConfig, ClientError, Session, SessionState, WritePhase};

mod common;
use common::{Finality, MockLedger, EXPLORER};

fn session(initial: &str) -> Session<MockLedger> {
    Session::new(MockLedger::new(initial), EXPLORER)
}

#[tokio::test]
async fn fresh_session_reads_current_value() {
    let session = session("Hello");

    let value = session.load_value().await.unwrap();

    assert_eq!(value, "Hello");
    let state = session.snapshot();
    assert_eq!(state.current_value.as_deref(), Some("Hello"));
    assert_eq!(state.error_message(), "");
    assert!(state.connected);
    assert!(!state.in_progress);
}

#[tokio::test]
async fn transaction_id_is_visible_before_confirmation() {
    let (ledger, gate) = MockLedger::gated("Hello");
    let session = Arc::new(Session::new(ledger, EXPLORER));
    session.set_draft("Bonjour Hedera");

    let mut updates = session.subscribe();
    let writer = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_draft().await })
    };

    let pending: SessionState = updates
        .wait_for(|s| s.phase == WritePhase::Pending)
        .await
        .unwrap()
        .clone();
    let tx_hash = pending.transaction_id.expect("hash published while pending");
    assert!(pending.in_progress);
    assert_eq!(
        pending.pending.as_ref().map(|p| p.status),
        Some(RequestStatus::Submitted)
    );
    assert_eq!(pending.pending.as_ref().and_then(|p| p.tx_hash), Some(tx_hash));
    // Not applied on the ledger yet
    assert_eq!(session.contract().stored(), "Hello");
    assert_eq!(
        session.explorer_link(),
        Some(format!("{}{}", EXPLORER, tx_hash))
    );

    gate.notify_one();
    let value = writer.await.unwrap().unwrap();

    assert_eq!(value, "Bonjour Hedera");
    assert_eq!(session.load_value().await.unwrap(), "Bonjour Hedera");

    let state = session.snapshot();
    assert_eq!(state.draft, "");
    assert_eq!(state.phase, WritePhase::Idle);
    assert!(state.pending.is_none());
    assert_eq!(state.transaction_id, Some(tx_hash));
    assert_eq!(state.last_status, Some(RequestStatus::Confirmed));
    assert!(!state.in_progress);
}

#[tokio::test]
async fn empty_input_never_reaches_the_network() {
    let session = session("Hello");
    session.load_value().await.unwrap();

    for input in ["", "   ", "\n\t "] {
        let err = session.submit_update(input).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let state = session.snapshot();
        assert_eq!(state.error_message(), EMPTY_MESSAGE_ERROR);
        assert!(state.transaction_id.is_none());
        assert_eq!(state.current_value.as_deref(), Some("Hello"));
        assert_eq!(state.phase, WritePhase::Idle);
    }

    assert_eq!(session.contract().submissions(), 0);
}

#[tokio::test]
async fn connection_drop_during_confirmation_fails_the_write() {
    let session = session("Hello");
    session.load_value().await.unwrap();
    session.contract().set_finality(Finality::DropConnection);

    let err = session.submit_update("Bonjour").await.unwrap_err();

    let tx_hash = match err {
        ClientError::Confirmation { tx_hash, .. } => tx_hash,
        other => panic!("expected confirmation error, got {other:?}"),
    };
    let state = session.snapshot();
    assert_eq!(state.phase, WritePhase::Idle);
    assert_eq!(state.last_status, Some(RequestStatus::Failed));
    assert!(state.error_message().contains("connection reset"));
    assert!(!state.in_progress);
    assert!(state.pending.is_none());
    assert_eq!(state.current_value.as_deref(), Some("Hello"));
    assert_eq!(state.transaction_id, Some(tx_hash));
    assert!(session.explorer_link().is_some());
}

#[tokio::test]
async fn missing_configuration_prevents_connection() {
    let config = ClientConfig::default();
    let endpoint = EndpointBinding {
        rpc_url: config.network.rpc_url.clone(),
        ..EndpointBinding::default()
    };
    let (state, observer) = watch::channel(SessionState::default());

    let err = Session::establish_with(&config, &endpoint, state).err().unwrap();

    assert!(matches!(err, ClientError::Config(_)));
    assert!(err.is_fatal());
    let observed = observer.borrow().clone();
    assert!(!observed.connected);
    assert!(observed.error_message().contains("configuration error"));
    assert!(observed.transaction_id.is_none());
}

#[tokio::test]
async fn establish_flips_observed_state_to_connected() {
    let config = ClientConfig::default();
    let endpoint = EndpointBinding {
        rpc_url: "http://127.0.0.1:1".to_string(),
        private_key: "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80".to_string(),
        contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
    };
    let (state, observer) = watch::channel(SessionState::default());
    assert!(!observer.borrow().connected);

    let session = Session::establish_with(&config, &endpoint, state).unwrap();

    assert!(observer.borrow().connected);
    assert!(session.snapshot().connected);
    assert_eq!(session.snapshot().error, None);
}

#[tokio::test]
async fn second_write_while_pending_is_rejected() {
    let (ledger, gate) = MockLedger::gated("Hello");
    let session = Arc::new(Session::new(ledger, EXPLORER));

    let mut updates = session.subscribe();
    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_update("first").await })
    };
    updates
        .wait_for(|s| s.phase == WritePhase::Pending)
        .await
        .unwrap();

    let before = session.snapshot();
    let err = session.submit_update("second").await.unwrap_err();
    assert!(matches!(err, ClientError::WriteInFlight));

    let after = session.snapshot();
    assert_eq!(after.transaction_id, before.transaction_id);
    assert_eq!(after.phase, WritePhase::Pending);
    assert_eq!(after.error, None);
    assert_eq!(session.contract().submissions(), 1);

    gate.notify_one();
    assert_eq!(first.await.unwrap().unwrap(), "first");
    assert_eq!(session.contract().stored(), "first");
}

#[tokio::test]
async fn write_then_read_is_consistent() {
    let session = session("Hello");

    for message in ["Bonjour Hedera", "  padded  ", "ünïcödé ✓", "a"] {
        let confirmed = session.submit_update(message).await.unwrap();
        assert_eq!(confirmed, message.trim());
        assert_eq!(session.load_value().await.unwrap(), message.trim());
    }

    assert_eq!(session.contract().submissions(), 4);
}

#[tokio::test]
async fn repeated_reads_are_idempotent() {
    let session = session("steady");

    let first = session.load_value().await.unwrap();
    for _ in 0..5 {
        assert_eq!(session.load_value().await.unwrap(), first);
    }
    assert_eq!(session.contract().reads(), 6);
}

#[tokio::test]
async fn read_failure_keeps_stale_value() {
    let session = session("Hello");
    session.load_value().await.unwrap();

    session.contract().fail_reads(true);
    let err = session.load_value().await.unwrap_err();
    assert!(matches!(err, ClientError::RemoteCall(_)));

    let state = session.snapshot();
    assert_eq!(state.current_value.as_deref(), Some("Hello"));
    assert!(state.error_message().contains("connection refused"));
    assert!(!state.in_progress);

    // The next successful read clears the error
    session.contract().fail_reads(false);
    session.load_value().await.unwrap();
    assert_eq!(session.snapshot().error, None);
}

#[tokio::test]
async fn rejected_submission_produces_no_transaction_id() {
    let session = session("Hello");
    session.submit_update("first").await.unwrap();
    assert!(session.snapshot().transaction_id.is_some());

    session.contract().reject_submissions("insufficient funds for gas");
    let err = session.submit_update("second").await.unwrap_err();
    assert!(matches!(err, ClientError::Submission(_)));

    let state = session.snapshot();
    assert!(state.transaction_id.is_none());
    assert_eq!(state.last_status, Some(RequestStatus::Failed));
    assert!(state.error_message().contains("insufficient funds"));
    assert_eq!(state.phase, WritePhase::Idle);
    assert!(!state.in_progress);
    assert_eq!(session.contract().stored(), "first");
}

#[tokio::test]
async fn reverted_transaction_keeps_hash_and_value() {
    let session = session("Hello");
    session.load_value().await.unwrap();
    session.contract().set_finality(Finality::Revert);

    let err = session.submit_update("nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Confirmation { .. }));

    let state = session.snapshot();
    assert!(state.transaction_id.is_some());
    assert!(state.error_message().contains("reverted"));
    assert_eq!(state.current_value.as_deref(), Some("Hello"));
    assert_eq!(session.contract().stored(), "Hello");

    // No automatic retry
    assert_eq!(session.contract().submissions(), 1);
}

#[tokio::test]
async fn failed_write_keeps_draft_for_resubmission() {
    let session = session("Hello");
    session.contract().set_finality(Finality::DropConnection);
    session.set_draft("retry me");

    session.submit_draft().await.unwrap_err();
    assert_eq!(session.snapshot().draft, "retry me");

    session.contract().set_finality(Finality::Confirm);
    assert_eq!(session.submit_draft().await.unwrap(), "retry me");
    assert_eq!(session.snapshot().draft, "");
}

#[tokio::test]
async fn aborted_write_releases_the_session() {
    let (ledger, gate) = MockLedger::gated("Hello");
    let session = Arc::new(Session::new(ledger, EXPLORER));

    let mut updates = session.subscribe();
    let writer = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_update("abandoned").await })
    };
    updates
        .wait_for(|s| s.phase == WritePhase::Pending)
        .await
        .unwrap();

    writer.abort();
    assert!(writer.await.unwrap_err().is_cancelled());

    let state = session.snapshot();
    assert!(!state.in_progress);
    assert_eq!(state.phase, WritePhase::Idle);
    assert!(state.pending.is_none());

    // The slot is free again
    gate.notify_one();
    assert_eq!(session.submit_update("next").await.unwrap(), "next");
}

#[tokio::test]
async fn clear_error_empties_message() {
    let session = session("Hello");
    session.submit_update(" ").await.unwrap_err();
    assert!(!session.snapshot().error_message().is_empty());

    session.clear_error();
    assert_eq!(session.snapshot().error_message(), "");
}

#[tokio::test]
async fn confirmed_write_survives_failed_read_back() {
    let session = session("Hello");
    session.set_draft("Bonjour");
    session.contract().fail_reads(true);

    let err = session.submit_draft().await.unwrap_err();

    assert!(matches!(err, ClientError::RemoteCall(_)));
    assert_eq!(session.contract().stored(), "Bonjour");
    let state = session.snapshot();
    assert_eq!(state.last_status, Some(RequestStatus::Confirmed));
    assert!(state.transaction_id.is_some());
    assert_eq!(state.current_value, None);
    assert!(state.error_message().contains("connection refused"));
    assert_eq!(state.draft, "");
    assert_eq!(state.phase, WritePhase::Idle);
    assert!(state.pending.is_none());
    assert!(!state.in_progress);

    // The slot is free and the next read catches up
    session.contract().fail_reads(false);
    assert_eq!(session.load_value().await.unwrap(), "Bonjour");
}

#[tokio::test]
async fn draft_is_locked_while_write_is_pending() {
    let (ledger, gate) = MockLedger::gated("Hello");
    let session = Arc::new(Session::new(ledger, EXPLORER));
    assert!(session.set_draft("first"));

    let mut updates = session.subscribe();
    let writer = {
        let session = session.clone();
        tokio::spawn(async move { session.submit_draft().await })
    };
    updates
        .wait_for(|s| s.phase == WritePhase::Pending)
        .await
        .unwrap();

    assert!(!session.set_draft("edited mid-flight"));
    assert_eq!(session.snapshot().draft, "first");

    gate.notify_one();
    assert_eq!(writer.await.unwrap().unwrap(), "first");
    assert_eq!(session.snapshot().draft, "");
    assert!(session.set_draft("after"));
    assert_eq!(session.snapshot().draft, "after");
}

#[tokio::test]
async fn direct_submit_leaves_unrelated_draft() {
    let session = session("Hello");
    session.set_draft("keep me");

    assert_eq!(session.submit_update("something else").await.unwrap(), "something else");

    assert_eq!(session.snapshot().draft, "keep me");
}
