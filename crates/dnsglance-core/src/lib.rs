// # dnsglance-core
//
// Core library for dnsglance.
//
// ## Architecture Overview
//
// This library provides the data logic behind the landing page's DNS widget
// and its animated tagline:
// - **DnsResolver**: Trait for resolving a hostname for one record type
// - **ProviderLookup**: Trait for mapping an address to its network provider
// - **ResolutionWorkflow**: Runs both families concurrently with a minimum
//   display delay and publishes the loading flag and results
// - **BackendRegistry**: Plugin-based registry for resolver and lookup backends
// - **Typewriter**: Infinite typing/deleting sequence over a word list
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Workflow logic is separate from HTTP backends
// 2. **Silent Degradation**: Backend failures shrink the result, never the caller
// 3. **Plugin-Based**: Backends are registered dynamically
// 4. **Library-First**: The binary is a thin wrapper around this crate

pub mod traits;
pub mod model;
pub mod workflow;
pub mod typewriter;
pub mod registry;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsResolver, ProviderLookup};
pub use model::{AddressSet, RecordType, ResolutionRecord};
pub use workflow::{Outcome, ResolutionWorkflow, WorkflowEvent, WorkflowPhase, WorkflowSnapshot};
pub use typewriter::{Frame, Typewriter};
pub use registry::BackendRegistry;
pub use config::{GlanceConfig, ProviderLookupConfig, ResolverConfig, TypewriterConfig, WorkflowConfig};
pub use error::{Error, Result};
