//! Contract Test: Re-activation
//!
//! This test verifies the activation lifecycle.
//!
//! Constraints verified:
//! - A fresh workflow is Idle and loading
//! - Re-activation resets loading and re-issues both DNS queries
//! - Results of a superseded activation are never published

mod common;

use common::*;
use dnsglance_core::model::RecordType;
use dnsglance_core::workflow::{Outcome, ResolutionWorkflow, WorkflowEvent, WorkflowPhase};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn fresh_workflow_is_idle() {
    let (workflow, _event_rx) = ResolutionWorkflow::new(
        Box::new(ScriptedResolver::new()),
        Box::new(ScriptedLookup::new()),
        &minimal_config(),
    )
    .expect("workflow construction succeeds");

    assert_eq!(workflow.snapshot().phase, WorkflowPhase::Idle);
    assert!(workflow.is_loading());
    assert_eq!(workflow.hostname(), "example.com");
}

#[tokio::test(start_paused = true)]
async fn reactivation_resets_loading_and_requeries() {
    let resolver = ScriptedResolver::new()
        .answer(RecordType::A, &["192.0.2.1"])
        .answer(RecordType::Aaaa, &["2001:db8::1"]);
    let dns_calls = resolver.call_counter();
    let lookup = ScriptedLookup::new().known("192.0.2.1", "Example Transit");

    let (workflow, mut event_rx) =
        ResolutionWorkflow::new(Box::new(resolver), Box::new(lookup), &minimal_config())
            .expect("workflow construction succeeds");
    let workflow = Arc::new(workflow);

    let first = workflow.activate().await;
    assert!(!workflow.is_loading());
    assert_eq!(dns_calls.load(Ordering::SeqCst), 2);

    let mut snapshots = workflow.subscribe();
    let handle = tokio::spawn({
        let workflow = Arc::clone(&workflow);
        async move { workflow.activate().await }
    });

    snapshots.changed().await.expect("workflow alive");
    {
        let snapshot = snapshots.borrow_and_update();
        assert_eq!(snapshot.phase, WorkflowPhase::Fetching);
        assert!(snapshot.is_loading(), "re-activation sets loading again");
        assert!(snapshot.addresses.is_empty(), "previous results are discarded");
    }

    let second = handle.await.expect("activation task completes");
    assert_eq!(dns_calls.load(Ordering::SeqCst), 4, "both pipelines re-issued");
    assert_eq!(first, second);

    let activations = drain_events(&mut event_rx)
        .into_iter()
        .filter(|e| matches!(e, WorkflowEvent::Activated { .. }))
        .count();
    assert_eq!(activations, 2);
}

#[tokio::test(start_paused = true)]
async fn superseded_activation_does_not_publish() {
    let resolver = ScriptedResolver::new()
        .answer(RecordType::A, &["192.0.2.1"])
        .with_delay(Duration::from_millis(2000));

    let (workflow, _event_rx) = ResolutionWorkflow::new(
        Box::new(resolver),
        Box::new(ScriptedLookup::new()),
        &minimal_config(),
    )
    .expect("workflow construction succeeds");
    let workflow = Arc::new(workflow);

    let older = tokio::spawn({
        let workflow = Arc::clone(&workflow);
        async move { workflow.activate().await }
    });

    tokio::time::sleep(Duration::from_millis(500)).await;
    let newer = tokio::spawn({
        let workflow = Arc::clone(&workflow);
        async move { workflow.activate().await }
    });

    // The older activation settles at 2000 ms, the newer one at 2500 ms
    tokio::time::sleep(Duration::from_millis(1700)).await;
    older.await.expect("older activation completes");
    assert!(
        workflow.is_loading(),
        "older results must not clear the newer activation's loading flag"
    );

    newer.await.expect("newer activation completes");
    assert_eq!(
        workflow.snapshot().phase,
        WorkflowPhase::Settled(Outcome::Success)
    );
}
