// # DNS Resolver Trait
//
// Defines the interface for resolving a hostname to the addresses of one
// record type.
//
// ## Implementations
//
// - DNS-over-HTTPS (JSON API): `dnsglance-doh` crate
//
// ## Usage
//
// ```rust,ignore
// use dnsglance_core::{DnsResolver, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* DnsResolver implementation */;
//
//     let addrs = resolver.resolve("example.com", RecordType::A).await?;
//     println!("{:?}", addrs);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

use crate::model::RecordType;

/// Trait for DNS resolver implementations
///
/// A resolver performs exactly one upstream query per call.
///
/// # Contract
///
/// - An upstream answer without an answer section is `Ok(vec![])`, not an error.
/// - Returned addresses keep the upstream order and are not deduplicated.
/// - Every returned address belongs to the family of `record_type`.
/// - Transport failures, non-success statuses and malformed bodies are errors.
///   The workflow decides what an error means; resolvers never retry.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve `hostname` restricted to `record_type`
    async fn resolve(
        &self,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<Vec<IpAddr>, crate::Error>;

    /// Short name used in logs and events
    fn resolver_name(&self) -> &'static str;
}

/// Helper trait for constructing resolvers from configuration
pub trait DnsResolverFactory: Send + Sync {
    /// Create a DnsResolver instance from configuration
    fn create(
        &self,
        config: &crate::config::ResolverConfig,
    ) -> Result<Box<dyn DnsResolver>, crate::Error>;
}
