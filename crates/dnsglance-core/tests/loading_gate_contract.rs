//! Contract Test: Loading Gate
//!
//! This test verifies that the loading flag clears only after both DNS
//! pipelines settled AND the minimum display delay elapsed.
//!
//! If this test fails, fast answers flash on screen or the view stops
//! loading before every provider lookup finished.

mod common;

use common::*;
use dnsglance_core::config::WorkflowConfig;
use dnsglance_core::model::RecordType;
use dnsglance_core::workflow::ResolutionWorkflow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn fast_answers_wait_for_minimum_delay() {
    let resolver = ScriptedResolver::new().answer(RecordType::A, &["192.0.2.1"]);
    let lookup = ScriptedLookup::new().known("192.0.2.1", "Example Transit");

    let (workflow, _event_rx) =
        ResolutionWorkflow::new(Box::new(resolver), Box::new(lookup), &minimal_config())
            .expect("workflow construction succeeds");
    let workflow = Arc::new(workflow);

    let start = Instant::now();
    let handle = tokio::spawn({
        let workflow = Arc::clone(&workflow);
        async move { workflow.activate().await }
    });

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(workflow.is_loading(), "still loading before the minimum delay");

    handle.await.expect("activation task completes");
    assert!(!workflow.is_loading());
    assert!(start.elapsed() >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn slow_dns_answer_extends_loading() {
    let resolver = ScriptedResolver::new()
        .answer(RecordType::A, &["192.0.2.1"])
        .with_delay(Duration::from_millis(1500));
    let lookup = ScriptedLookup::new();

    let (workflow, _event_rx) =
        ResolutionWorkflow::new(Box::new(resolver), Box::new(lookup), &minimal_config())
            .expect("workflow construction succeeds");

    let start = Instant::now();
    let addresses = workflow.activate().await;

    assert_eq!(addresses.a.len(), 1);
    assert!(start.elapsed() >= Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn slow_provider_lookup_extends_loading() {
    let resolver = ScriptedResolver::new()
        .answer(RecordType::A, &["192.0.2.1"])
        .answer(RecordType::Aaaa, &["2001:db8::1"]);
    let lookup = ScriptedLookup::new()
        .known("2001:db8::1", "Slow Carrier")
        .slow("2001:db8::1", Duration::from_millis(1800));

    let (workflow, _event_rx) =
        ResolutionWorkflow::new(Box::new(resolver), Box::new(lookup), &minimal_config())
            .expect("workflow construction succeeds");
    let workflow = Arc::new(workflow);

    let handle = tokio::spawn({
        let workflow = Arc::clone(&workflow);
        async move { workflow.activate().await }
    });

    tokio::time::sleep(Duration::from_millis(1200)).await;
    let snapshot = workflow.snapshot();
    assert!(snapshot.is_loading(), "AAAA batch has not finished yet");
    assert!(
        snapshot.addresses.is_empty(),
        "no partial results while fetching"
    );

    let addresses = handle.await.expect("activation task completes");
    assert_eq!(
        addresses.aaaa[0].provider.as_deref(),
        Some("Slow Carrier")
    );
}

#[tokio::test(start_paused = true)]
async fn minimum_delay_is_configurable() {
    let mut config = minimal_config();
    config.workflow = WorkflowConfig {
        min_display_delay_ms: 0,
        ..WorkflowConfig::default()
    };

    let (workflow, _event_rx) = ResolutionWorkflow::new(
        Box::new(ScriptedResolver::new()),
        Box::new(ScriptedLookup::new()),
        &config,
    )
    .expect("workflow construction succeeds");

    let start = Instant::now();
    workflow.activate().await;
    assert!(start.elapsed() < Duration::from_millis(1));
}
