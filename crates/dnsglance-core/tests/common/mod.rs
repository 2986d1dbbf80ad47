//! Test doubles and common utilities for workflow contract tests
//!
//! The doubles answer from a script instead of the network, optionally after
//! a delay, and count how often they were called.

#![allow(dead_code)]

use dnsglance_core::config::GlanceConfig;
use dnsglance_core::error::{Error, Result};
use dnsglance_core::model::RecordType;
use dnsglance_core::traits::{DnsResolver, ProviderLookup};
use dnsglance_core::workflow::WorkflowEvent;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Parse an address literal
pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid address literal")
}

/// A resolver that answers from a per-family script
///
/// Families without a script answer with no records.
pub struct ScriptedResolver {
    answers: HashMap<RecordType, std::result::Result<Vec<IpAddr>, String>>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `record_type` with `addrs`, in that order
    pub fn answer(mut self, record_type: RecordType, addrs: &[&str]) -> Self {
        self.answers
            .insert(record_type, Ok(addrs.iter().map(|a| ip(a)).collect()));
        self
    }

    /// Fail every query for `record_type`
    pub fn fail(mut self, record_type: RecordType, message: &str) -> Self {
        self.answers.insert(record_type, Err(message.to_string()));
        self
    }

    /// Wait `delay` before every answer
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared counter of resolve() calls
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl DnsResolver for ScriptedResolver {
    async fn resolve(&self, _hostname: &str, record_type: RecordType) -> Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.answers.get(&record_type) {
            Some(Ok(addrs)) => Ok(addrs.clone()),
            Some(Err(message)) => Err(Error::resolver(message.clone())),
            None => Ok(Vec::new()),
        }
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// A provider lookup that knows a fixed set of addresses
///
/// Unknown addresses fail, like a `success: false` answer would.
pub struct ScriptedLookup {
    providers: HashMap<IpAddr, String>,
    delays: HashMap<IpAddr, Duration>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            delays: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `addr` with `provider`
    pub fn known(mut self, addr: &str, provider: &str) -> Self {
        self.providers.insert(ip(addr), provider.to_string());
        self
    }

    /// Delay the answer for `addr`
    pub fn slow(mut self, addr: &str, delay: Duration) -> Self {
        self.delays.insert(ip(addr), delay);
        self
    }

    /// Shared counter of lookup() calls
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl ProviderLookup for ScriptedLookup {
    async fn lookup(&self, ip: IpAddr) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&ip) {
            tokio::time::sleep(*delay).await;
        }

        self.providers
            .get(&ip)
            .cloned()
            .ok_or_else(|| Error::provider_lookup(format!("no data for {}", ip)))
    }

    fn lookup_name(&self) -> &'static str {
        "scripted"
    }
}

/// Helper to create a minimal GlanceConfig for testing
pub fn minimal_config() -> GlanceConfig {
    GlanceConfig::new().with_hostname("example.com")
}

/// Drain every event currently queued
pub fn drain_events(rx: &mut mpsc::Receiver<WorkflowEvent>) -> Vec<WorkflowEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
