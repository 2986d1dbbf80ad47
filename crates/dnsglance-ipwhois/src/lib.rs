// # IP Metadata Provider Lookup
//
// This crate maps an IP address to the name of the network that announces
// it, using an ipwho.is style JSON API.
//
// ## Request
//
// ```http
// GET {url}/{ip}
// ```
//
// ## Response
//
// ```json
// { "ip": "192.0.2.1", "success": true, "connection": { "asn": 64500, "org": "Example Org", "isp": "Example ISP" } }
// { "success": false, "message": "Reserved range" }
// ```
//
// The label is `connection.isp`, falling back to `connection.org`.
//
// ## Failure semantics
//
// Every failure is an error: transport errors, non-success statuses,
// `success: false`, and answers without a usable name. The workflow turns
// any of them into an absent provider for that one address. No retries.

use async_trait::async_trait;
use dnsglance_core::BackendRegistry;
use dnsglance_core::config::ProviderLookupConfig;
use dnsglance_core::traits::{ProviderLookup, ProviderLookupFactory};
use dnsglance_core::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;

/// Default HTTP timeout for lookups
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("dnsglance/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct IpWhoisResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    connection: Option<Connection>,
}

#[derive(Debug, Deserialize)]
struct Connection {
    isp: Option<String>,
    org: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Pick the provider label out of a lookup response
fn provider_label(ip: IpAddr, response: IpWhoisResponse) -> Result<String> {
    if !response.success {
        return Err(Error::provider_lookup(format!(
            "Lookup for {} unsuccessful: {}",
            ip,
            response.message.as_deref().unwrap_or("no reason given")
        )));
    }

    let connection = response
        .connection
        .ok_or_else(|| Error::not_found(format!("No connection data for {}", ip)))?;

    non_empty(connection.isp)
        .or_else(|| non_empty(connection.org))
        .ok_or_else(|| Error::not_found(format!("No ISP or organization for {}", ip)))
}

/// ipwho.is style provider lookup
#[derive(Debug, Clone)]
pub struct IpWhoisLookup {
    /// Base URL, the address is appended as a path segment
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl IpWhoisLookup {
    /// Create a new lookup with the default timeout
    ///
    /// # Parameters
    ///
    /// - `base_url`: API base (e.g., "https://ipwho.is")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create with custom HTTP timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), ip)
    }
}

#[async_trait]
impl ProviderLookup for IpWhoisLookup {
    async fn lookup(&self, ip: IpAddr) -> Result<String> {
        let url = self.lookup_url(ip);
        tracing::debug!("Provider lookup: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::backend("ipwhois", format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();

            let reason = match status.as_u16() {
                429 => "rate limited",
                500..=599 => "server error",
                _ => "request rejected",
            };
            return Err(Error::backend(
                "ipwhois",
                format!("Lookup failed, {}: {}", reason, status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::backend("ipwhois", format!("Failed to read response: {}", e)))?;
        let body: IpWhoisResponse = serde_json::from_str(&body)?;

        provider_label(ip, body)
    }

    fn lookup_name(&self) -> &'static str {
        "ipwhois"
    }
}

/// Factory for creating ipwho.is lookups
pub struct IpWhoisFactory;

impl ProviderLookupFactory for IpWhoisFactory {
    fn create(&self, config: &ProviderLookupConfig) -> Result<Box<dyn ProviderLookup>> {
        match config {
            ProviderLookupConfig::IpWhois { url, timeout_secs } => Ok(Box::new(
                IpWhoisLookup::with_timeout(url.clone(), Duration::from_secs(*timeout_secs))?,
            )),
            _ => Err(Error::config("Invalid config for ipwhois provider lookup")),
        }
    }
}

/// Register the ipwho.is lookup with a registry
///
/// # Example
///
/// ```rust
/// use dnsglance_core::BackendRegistry;
///
/// let registry = BackendRegistry::new();
/// dnsglance_ipwhois::register(&registry);
/// assert!(registry.has_provider_lookup("ipwhois"));
/// ```
pub fn register(registry: &BackendRegistry) {
    registry.register_provider_lookup("ipwhois", Box::new(IpWhoisFactory));
}
