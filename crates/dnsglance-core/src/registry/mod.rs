//! Plugin-based backend registry
//!
//! The registry allows DNS resolvers and provider lookups to be registered
//! dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnsglance_core::registry::BackendRegistry;
//! use dnsglance_core::config::ResolverConfig;
//!
//! let registry = BackendRegistry::new();
//! dnsglance_doh::register(&registry);
//!
//! let resolver = registry.create_resolver(&ResolverConfig::default())?;
//! ```

use crate::config::{ProviderLookupConfig, ResolverConfig};
use crate::error::{Error, Result};
use crate::traits::{DnsResolver, DnsResolverFactory, ProviderLookup, ProviderLookupFactory};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Backend registry for plugin-based resolver and lookup creation
///
/// The registry maintains a map of backend type names to factory objects.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct BackendRegistry {
    /// Registered DNS resolver factories
    resolvers: RwLock<HashMap<String, Box<dyn DnsResolverFactory>>>,

    /// Registered provider lookup factories
    lookups: RwLock<HashMap<String, Box<dyn ProviderLookupFactory>>>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a DNS resolver factory
    ///
    /// # Parameters
    ///
    /// - `name`: Resolver type name (e.g., "doh")
    /// - `factory`: Factory object for creating resolver instances
    pub fn register_resolver(&self, name: impl Into<String>, factory: Box<dyn DnsResolverFactory>) {
        let mut resolvers = self
            .resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        resolvers.insert(name.into(), factory);
    }

    /// Register a provider lookup factory
    ///
    /// # Parameters
    ///
    /// - `name`: Lookup type name (e.g., "ipwhois")
    /// - `factory`: Factory object for creating lookup instances
    pub fn register_provider_lookup(
        &self,
        name: impl Into<String>,
        factory: Box<dyn ProviderLookupFactory>,
    ) {
        let mut lookups = self.lookups.write().unwrap_or_else(PoisonError::into_inner);
        lookups.insert(name.into(), factory);
    }

    /// Create a DNS resolver from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn DnsResolver>)`: Created resolver instance
    /// - `Err(Error)`: If the resolver type is not registered or creation fails
    pub fn create_resolver(&self, config: &ResolverConfig) -> Result<Box<dyn DnsResolver>> {
        let resolver_type = config.type_name();
        let resolvers = self.resolvers.read().unwrap_or_else(PoisonError::into_inner);

        let factory = resolvers
            .get(resolver_type)
            .ok_or_else(|| Error::config(format!("Unknown resolver type: {}", resolver_type)))?;

        factory.create(config)
    }

    /// Create a provider lookup from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn ProviderLookup>)`: Created lookup instance
    /// - `Err(Error)`: If the lookup type is not registered or creation fails
    pub fn create_provider_lookup(
        &self,
        config: &ProviderLookupConfig,
    ) -> Result<Box<dyn ProviderLookup>> {
        let lookup_type = config.type_name();
        let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);

        let factory = lookups.get(lookup_type).ok_or_else(|| {
            Error::config(format!("Unknown provider lookup type: {}", lookup_type))
        })?;

        factory.create(config)
    }

    /// List all registered resolver types
    pub fn list_resolvers(&self) -> Vec<String> {
        let resolvers = self.resolvers.read().unwrap_or_else(PoisonError::into_inner);
        resolvers.keys().cloned().collect()
    }

    /// List all registered provider lookup types
    pub fn list_provider_lookups(&self) -> Vec<String> {
        let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);
        lookups.keys().cloned().collect()
    }

    /// Check if a resolver type is registered
    pub fn has_resolver(&self, name: &str) -> bool {
        let resolvers = self.resolvers.read().unwrap_or_else(PoisonError::into_inner);
        resolvers.contains_key(name)
    }

    /// Check if a provider lookup type is registered
    pub fn has_provider_lookup(&self, name: &str) -> bool {
        let lookups = self.lookups.read().unwrap_or_else(PoisonError::into_inner);
        lookups.contains_key(name)
    }
}
