//! Core traits for dnsglance
//!
//! This module defines the abstract interfaces the workflow is built on.
//!
//! - [`DnsResolver`]: Resolve a hostname for one record type
//! - [`ProviderLookup`]: Map an address to its network provider label

pub mod resolver;
pub mod provider_lookup;

pub use resolver::{DnsResolver, DnsResolverFactory};
pub use provider_lookup::{ProviderLookup, ProviderLookupFactory};
