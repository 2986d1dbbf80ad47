// # Provider Lookup Trait
//
// Maps an IP address to a human-readable network provider label
// (ISP or organization name).
//
// ## Implementations
//
// - ipwho.is style JSON API: `dnsglance-ipwhois` crate

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for provider lookup implementations
///
/// Any failure is reported as an error; the workflow degrades it to an
/// absent provider for that one address.
#[async_trait]
pub trait ProviderLookup: Send + Sync {
    /// Look up the provider label for `ip`
    async fn lookup(&self, ip: IpAddr) -> Result<String, crate::Error>;

    /// Short name used in logs and events
    fn lookup_name(&self) -> &'static str;
}

/// Helper trait for constructing provider lookups from configuration
pub trait ProviderLookupFactory: Send + Sync {
    /// Create a ProviderLookup instance from configuration
    fn create(
        &self,
        config: &crate::config::ProviderLookupConfig,
    ) -> Result<Box<dyn ProviderLookup>, crate::Error>;
}
