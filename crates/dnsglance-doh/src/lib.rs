// # DNS-over-HTTPS Resolver
//
// This crate provides a DNS-over-HTTPS resolver for dnsglance, speaking the
// JSON flavour of DoH offered by public resolvers:
//
// - Google: `https://dns.google/resolve`
// - Cloudflare: `https://cloudflare-dns.com/dns-query`
//
// ## Request
//
// ```http
// GET {url}?name=example.com&type=A
// Accept: application/dns-json
// ```
//
// ## Response
//
// ```json
// { "Status": 0, "Answer": [{ "name": "example.com.", "type": 1, "TTL": 300, "data": "192.0.2.1" }] }
// ```
//
// A response without `Answer` is an empty result. Answer entries of another
// type (CNAME links in front of the address records) are skipped.
//
// ## Architecture
//
// One HTTP request per `resolve()` call. No retries, no caching.

use async_trait::async_trait;
use dnsglance_core::BackendRegistry;
use dnsglance_core::config::ResolverConfig;
use dnsglance_core::model::RecordType;
use dnsglance_core::traits::{DnsResolver, DnsResolverFactory};
use dnsglance_core::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Default HTTP timeout for DoH queries
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Media type of the DoH JSON API
const DNS_JSON: &str = "application/dns-json";

const USER_AGENT: &str = concat!("dnsglance/", env!("CARGO_PKG_VERSION"));

/// DoH JSON response body (only the fields we read)
#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Status", default)]
    status: Option<u32>,

    #[serde(rename = "Answer", default)]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
}

/// Extract the addresses of `record_type` from a DoH response, in answer order
fn parse_answers(response: DohResponse, record_type: RecordType) -> Vec<IpAddr> {
    let Some(answers) = response.answer else {
        tracing::debug!(
            "No answer section for {} query (status {:?})",
            record_type,
            response.status
        );
        return Vec::new();
    };

    answers
        .into_iter()
        .filter(|answer| answer.record_type == record_type.code())
        .filter_map(|answer| match answer.data.trim().parse::<IpAddr>() {
            Ok(ip) if record_type.matches(&ip) => Some(ip),
            _ => {
                tracing::warn!(
                    "Skipping {} answer with unusable data '{}'",
                    record_type,
                    answer.data
                );
                None
            }
        })
        .collect()
}

/// DNS-over-HTTPS (JSON API) resolver
#[derive(Debug, Clone)]
pub struct DohResolver {
    /// Endpoint URL
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl DohResolver {
    /// Create a new DoH resolver with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: Endpoint URL (e.g., "https://dns.google/resolve")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with custom HTTP timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DnsResolver for DohResolver {
    async fn resolve(&self, hostname: &str, record_type: RecordType) -> Result<Vec<IpAddr>> {
        tracing::debug!("DoH query: {} {} via {}", hostname, record_type, self.url);

        let response = self
            .client
            .get(&self.url)
            .query(&[("name", hostname), ("type", record_type.as_str())])
            .header(reqwest::header::ACCEPT, DNS_JSON)
            .send()
            .await
            .map_err(|e| Error::backend("doh", format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::backend(
                "doh",
                format!("HTTP error: {}", response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::backend("doh", format!("Failed to read response: {}", e)))?;
        let body: DohResponse = serde_json::from_str(&body)?;

        Ok(parse_answers(body, record_type))
    }

    fn resolver_name(&self) -> &'static str {
        "doh"
    }
}

/// Factory for creating DoH resolvers
pub struct DohFactory;

impl DnsResolverFactory for DohFactory {
    fn create(&self, config: &ResolverConfig) -> Result<Box<dyn DnsResolver>> {
        match config {
            ResolverConfig::Doh { url, timeout_secs } => Ok(Box::new(DohResolver::with_timeout(
                url.clone(),
                Duration::from_secs(*timeout_secs),
            )?)),
            _ => Err(Error::config("Invalid config for DoH resolver")),
        }
    }
}

/// Register the DoH resolver with a registry
pub fn register(registry: &BackendRegistry) {
    registry.register_resolver("doh", Box::new(DohFactory));
}
