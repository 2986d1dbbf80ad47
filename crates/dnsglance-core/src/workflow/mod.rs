//! DNS/provider resolution workflow
//!
//! The ResolutionWorkflow is responsible for:
//! - Resolving the configured hostname's A and AAAA records
//! - Looking up the network provider of every resolved address
//! - Holding the loading state for a minimum display delay
//! - Publishing snapshots and events for whoever renders the result
//!
//! ## Architecture
//!
//! ```text
//!                    activate()
//!                        │
//!        ┌───────────────┼────────────────┐
//!        ▼               ▼                ▼
//! ┌─────────────┐ ┌─────────────┐ ┌───────────────┐
//! │ A pipeline  │ │AAAA pipeline│ │ minimum delay │
//! └─────────────┘ └─────────────┘ └───────────────┘
//!   resolve()       resolve()
//!   lookup() x N    lookup() x M
//!        │               │                │
//!        └───────────────┼────────────────┘
//!                        ▼
//!              WorkflowSnapshot (watch)
//!              WorkflowEvent (mpsc)
//! ```
//!
//! ## Phases
//!
//! `Idle → Fetching → Settled(Success | Failure)`. A teardown signal moves
//! a running activation to `Cancelled`. Only a fresh activation goes back
//! to `Fetching`.

use crate::config::GlanceConfig;
use crate::error::{Error, Result};
use crate::model::{AddressSet, RecordType, ResolutionRecord};
use crate::traits::{DnsResolver, ProviderLookup};
use futures::future::join_all;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

/// How a settled activation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both DNS pipelines answered
    Success,
    /// At least one DNS pipeline failed; both lists are empty
    Failure,
}

/// Lifecycle phase of the most recent activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// Never activated
    Idle,
    /// Pipelines or the minimum delay still running
    Fetching,
    /// All pipelines and the minimum delay completed
    Settled(Outcome),
    /// Torn down before settling
    Cancelled,
}

/// What a view renders: the phase plus the addresses known so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    /// Current phase
    pub phase: WorkflowPhase,
    /// Addresses of the last settled activation (empty while fetching)
    pub addresses: AddressSet,
}

impl WorkflowSnapshot {
    /// The loading flag
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, WorkflowPhase::Idle | WorkflowPhase::Fetching)
    }
}

impl Default for WorkflowSnapshot {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            addresses: AddressSet::default(),
        }
    }
}

/// Events emitted by the ResolutionWorkflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// Activation started
    Activated {
        hostname: String,
    },

    /// One family's DNS answer and all its provider lookups completed
    FamilyResolved {
        record_type: RecordType,
        count: usize,
    },

    /// The DNS query of one family failed
    ResolutionFailed {
        record_type: RecordType,
        error: String,
    },

    /// The provider of one address could not be determined
    ProviderLookupFailed {
        ip: IpAddr,
        error: String,
    },

    /// Activation settled and the loading flag cleared
    Settled {
        outcome: Outcome,
        a_count: usize,
        aaaa_count: usize,
    },

    /// Activation torn down before settling
    Cancelled,
}

/// DNS/provider resolution workflow
///
/// One call to [`ResolutionWorkflow::activate`] is one activation. The
/// workflow can be activated any number of times; each activation replaces
/// the previous results. If activations overlap, only the most recent one
/// publishes its settled snapshot.
///
/// ## Error handling
///
/// Nothing is propagated to the caller:
/// - A failed DNS query (either family) settles the activation as
///   [`Outcome::Failure`] with both lists empty.
/// - A failed provider lookup keeps the address with `provider: None`.
pub struct ResolutionWorkflow {
    /// DNS resolver used for both families
    resolver: Box<dyn DnsResolver>,

    /// Provider lookup used for every address
    lookup: Box<dyn ProviderLookup>,

    /// Hostname to resolve
    hostname: String,

    /// Minimum time the loading state is held
    min_display_delay: Duration,

    /// Identifier of the most recent activation
    generation: AtomicU64,

    /// Snapshot publisher
    state_tx: watch::Sender<WorkflowSnapshot>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<WorkflowEvent>,
}

impl ResolutionWorkflow {
    /// Create a new resolution workflow
    ///
    /// # Parameters
    ///
    /// - `resolver`: DNS resolver implementation
    /// - `lookup`: Provider lookup implementation
    /// - `config`: dnsglance configuration
    ///
    /// # Returns
    ///
    /// A tuple of (workflow, event_receiver) where event_receiver yields workflow events
    pub fn new(
        resolver: Box<dyn DnsResolver>,
        lookup: Box<dyn ProviderLookup>,
        config: &GlanceConfig,
    ) -> Result<(Self, mpsc::Receiver<WorkflowEvent>)> {
        crate::config::validate_hostname(&config.hostname)?;
        config.workflow.validate()?;

        let (tx, rx) = mpsc::channel(config.workflow.event_channel_capacity);
        let (state_tx, _) = watch::channel(WorkflowSnapshot::default());

        let workflow = Self {
            resolver,
            lookup,
            hostname: config.hostname.clone(),
            min_display_delay: config.workflow.min_display_delay(),
            generation: AtomicU64::new(0),
            state_tx,
            event_tx: tx,
        };

        Ok((workflow, rx))
    }

    /// Hostname this workflow resolves
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.state_tx.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.state_tx.borrow().clone()
    }

    /// Current value of the loading flag
    pub fn is_loading(&self) -> bool {
        self.state_tx.borrow().is_loading()
    }

    /// Run one activation to completion
    ///
    /// Resolves both families concurrently with the minimum display delay
    /// and returns once all three are done. Failures degrade to empty or
    /// partial results, see the type-level docs.
    pub async fn activate(&self) -> AddressSet {
        let generation = self.begin();
        let (outcome, addresses) = self.run_pipelines().await;
        self.settle(generation, outcome, &addresses);
        addresses
    }

    /// Run one activation, aborting it when `shutdown_rx` fires
    ///
    /// The teardown signal fires when a value is sent or the sender is
    /// dropped. On teardown every in-flight request is dropped, the phase
    /// becomes [`WorkflowPhase::Cancelled`] and `Err(Error::Cancelled)` is
    /// returned. Without a receiver this behaves like [`Self::activate`].
    pub async fn activate_with_shutdown(
        &self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<AddressSet> {
        let Some(mut rx) = shutdown_rx else {
            return Ok(self.activate().await);
        };

        let generation = self.begin();

        tokio::select! {
            (outcome, addresses) = self.run_pipelines() => {
                self.settle(generation, outcome, &addresses);
                Ok(addresses)
            }

            _ = &mut rx => {
                info!("Teardown signal received, abandoning activation for {}", self.hostname);
                self.cancel(generation);
                Err(Error::Cancelled)
            }
        }
    }

    /// Enter the fetching phase and return the new activation id
    fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.state_tx.send_replace(WorkflowSnapshot {
            phase: WorkflowPhase::Fetching,
            addresses: AddressSet::default(),
        });

        info!("Resolving {} (activation {})", self.hostname, generation);
        self.emit_event(WorkflowEvent::Activated {
            hostname: self.hostname.clone(),
        });

        generation
    }

    /// Publish the settled snapshot unless a newer activation started
    fn settle(&self, generation: u64, outcome: Outcome, addresses: &AddressSet) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("Activation {} superseded, not publishing its results", generation);
            return;
        }

        info!(
            "Resolved {}: {} A, {} AAAA ({:?})",
            self.hostname,
            addresses.a.len(),
            addresses.aaaa.len(),
            outcome
        );

        self.state_tx.send_replace(WorkflowSnapshot {
            phase: WorkflowPhase::Settled(outcome),
            addresses: addresses.clone(),
        });

        self.emit_event(WorkflowEvent::Settled {
            outcome,
            a_count: addresses.a.len(),
            aaaa_count: addresses.aaaa.len(),
        });
    }

    fn cancel(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) == generation {
            self.state_tx.send_replace(WorkflowSnapshot {
                phase: WorkflowPhase::Cancelled,
                addresses: AddressSet::default(),
            });
        }
        self.emit_event(WorkflowEvent::Cancelled);
    }

    /// Both family pipelines joined with the minimum delay
    async fn run_pipelines(&self) -> (Outcome, AddressSet) {
        let (a, aaaa, _) = tokio::join!(
            self.resolve_family(RecordType::A),
            self.resolve_family(RecordType::Aaaa),
            tokio::time::sleep(self.min_display_delay),
        );

        match (a, aaaa) {
            (Ok(a), Ok(aaaa)) => (Outcome::Success, AddressSet { a, aaaa }),
            _ => (Outcome::Failure, AddressSet::default()),
        }
    }

    /// Resolve one family, then look up every address as one parallel batch
    async fn resolve_family(&self, record_type: RecordType) -> Result<Vec<ResolutionRecord>> {
        let addrs = match self.resolver.resolve(&self.hostname, record_type).await {
            Ok(addrs) => addrs,
            Err(e) => {
                error!(
                    "{} lookup of {} via {} failed: {}",
                    record_type,
                    self.hostname,
                    self.resolver.resolver_name(),
                    e
                );
                self.emit_event(WorkflowEvent::ResolutionFailed {
                    record_type,
                    error: e.to_string(),
                });
                return Err(e);
            }
        };

        debug!("{} {} answer(s) for {}", addrs.len(), record_type, self.hostname);

        let records = join_all(addrs.into_iter().map(|ip| self.lookup_provider(ip))).await;

        self.emit_event(WorkflowEvent::FamilyResolved {
            record_type,
            count: records.len(),
        });

        Ok(records)
    }

    async fn lookup_provider(&self, ip: IpAddr) -> ResolutionRecord {
        match self.lookup.lookup(ip).await {
            Ok(provider) => {
                debug!("{} is served by {}", ip, provider);
                ResolutionRecord::new(ip, Some(provider))
            }
            Err(e) => {
                debug!(
                    "Provider lookup for {} via {} failed: {}",
                    ip,
                    self.lookup.lookup_name(),
                    e
                );
                self.emit_event(WorkflowEvent::ProviderLookupFailed {
                    ip,
                    error: e.to_string(),
                });
                ResolutionRecord::new(ip, None)
            }
        }
    }

    /// Emit a workflow event
    fn emit_event(&self, event: WorkflowEvent) {
        // Bounded channel: when nobody drains it, events are dropped
        if self.event_tx.try_send(event).is_err() {
            warn!("Event channel full or closed, dropping workflow event");
        }
    }
}
