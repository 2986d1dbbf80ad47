//! Configuration types for dnsglance
//!
//! This module defines all configuration structures used throughout the crate.
//! Every value the page used to hard-code (hostname, nameservers, endpoint
//! URLs, delays, word list) lives here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hostname resolved when none is configured
pub const DEFAULT_HOSTNAME: &str = "tony-liu.com";

/// Default DNS-over-HTTPS JSON endpoint
pub const DEFAULT_DOH_URL: &str = "https://dns.google/resolve";

/// Default IP metadata endpoint
pub const DEFAULT_IPINFO_URL: &str = "https://ipwho.is";

/// Main dnsglance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlanceConfig {
    /// Hostname whose A and AAAA records are resolved
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Nameserver labels shown next to the results (display only)
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// DNS resolver backend
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Provider lookup backend
    #[serde(default)]
    pub provider_lookup: ProviderLookupConfig,

    /// Workflow settings
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Typewriter settings
    #[serde(default)]
    pub typewriter: TypewriterConfig,
}

impl GlanceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            hostname: default_hostname(),
            nameservers: Vec::new(),
            resolver: ResolverConfig::default(),
            provider_lookup: ProviderLookupConfig::default(),
            workflow: WorkflowConfig::default(),
            typewriter: TypewriterConfig::default(),
        }
    }

    /// Set the hostname
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_hostname(&self.hostname)?;
        self.resolver.validate()?;
        self.provider_lookup.validate()?;
        self.workflow.validate()?;
        self.typewriter.validate()?;

        Ok(())
    }
}

impl Default for GlanceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate that a string is a DNS hostname (RFC 1035 label rules)
///
/// A single trailing dot (fully-qualified form) is accepted.
pub fn validate_hostname(hostname: &str) -> Result<(), crate::Error> {
    let name = hostname.strip_suffix('.').unwrap_or(hostname);

    if name.is_empty() {
        return Err(crate::Error::config("Hostname cannot be empty"));
    }

    if name.len() > 253 {
        return Err(crate::Error::config(format!(
            "Hostname too long: {} chars (max 253)",
            name.len()
        )));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Hostname has empty label: '{}'",
                hostname
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Hostname label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(crate::Error::config(format!(
                "Hostname label contains invalid characters: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Hostname label cannot start or end with hyphen: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn validate_url(kind: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} URL cannot be empty", kind)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} URL must use HTTP or HTTPS scheme. Got: {}",
            kind, url
        )));
    }
    Ok(())
}

fn validate_timeout(kind: &str, timeout_secs: u64) -> Result<(), crate::Error> {
    if !(1..=120).contains(&timeout_secs) {
        return Err(crate::Error::config(format!(
            "{} timeout must be between 1 and 120 seconds. Got: {}",
            kind, timeout_secs
        )));
    }
    Ok(())
}

/// DNS resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolverConfig {
    /// DNS-over-HTTPS JSON API (Google / Cloudflare style)
    Doh {
        /// Endpoint URL, queried with `?name=..&type=..`
        url: String,
        /// HTTP timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom resolver
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ResolverConfig {
    /// Validate the resolver configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ResolverConfig::Doh { url, timeout_secs } => {
                validate_url("DoH", url)?;
                validate_timeout("DoH", *timeout_secs)
            }
            ResolverConfig::Custom { factory, .. } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom resolver factory cannot be empty",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the resolver type name
    pub fn type_name(&self) -> &str {
        match self {
            ResolverConfig::Doh { .. } => "doh",
            ResolverConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig::Doh {
            url: DEFAULT_DOH_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Provider lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderLookupConfig {
    /// ipwho.is style IP metadata API
    IpWhois {
        /// Base URL, queried as `{url}/{ip}`
        url: String,
        /// HTTP timeout in seconds
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },

    /// Custom provider lookup
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderLookupConfig {
    /// Validate the provider lookup configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderLookupConfig::IpWhois { url, timeout_secs } => {
                validate_url("IP info", url)?;
                validate_timeout("IP info", *timeout_secs)
            }
            ProviderLookupConfig::Custom { factory, .. } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider lookup factory cannot be empty",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider lookup type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderLookupConfig::IpWhois { .. } => "ipwhois",
            ProviderLookupConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderLookupConfig {
    fn default() -> Self {
        ProviderLookupConfig::IpWhois {
            url: DEFAULT_IPINFO_URL.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Minimum time (in milliseconds) the loading state is held
    ///
    /// Runs concurrently with both DNS pipelines, so fast answers do not
    /// flash on and off.
    #[serde(default = "default_min_display_delay_ms")]
    pub min_display_delay_ms: u64,

    /// Capacity of the internal event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl WorkflowConfig {
    /// Minimum display delay as a Duration
    pub fn min_display_delay(&self) -> Duration {
        Duration::from_millis(self.min_display_delay_ms)
    }

    /// Validate the workflow configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.min_display_delay_ms > 60_000 {
            return Err(crate::Error::config(format!(
                "Minimum display delay must be at most 60000 ms. Got: {}",
                self.min_display_delay_ms
            )));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            min_display_delay_ms: default_min_display_delay_ms(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Typewriter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypewriterConfig {
    /// Words cycled through, in order
    #[serde(default = "default_words")]
    pub words: Vec<String>,

    /// Typing interval in milliseconds (deleting runs at half of it)
    #[serde(default = "default_speed_ms")]
    pub speed_ms: u64,

    /// Hold time in milliseconds once a word is fully typed
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl TypewriterConfig {
    /// Validate the typewriter configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.words.is_empty() {
            return Err(crate::Error::config("Typewriter word list cannot be empty"));
        }
        if self.speed_ms == 0 {
            return Err(crate::Error::config("Typewriter speed must be > 0"));
        }
        Ok(())
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            words: default_words(),
            speed_ms: default_speed_ms(),
            pause_ms: default_pause_ms(),
        }
    }
}

fn default_hostname() -> String {
    DEFAULT_HOSTNAME.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_min_display_delay_ms() -> u64 {
    1000
}

fn default_event_channel_capacity() -> usize {
    64
}

fn default_words() -> Vec<String> {
    [
        "React",
        "Node.js",
        "Next.js",
        "Python",
        "JavaScript",
        "Docker",
        "SQLite",
        "MySQL",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect()
}

fn default_speed_ms() -> u64 {
    90
}

fn default_pause_ms() -> u64 {
    1500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GlanceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workflow.min_display_delay(), Duration::from_millis(1000));
        assert_eq!(config.resolver.type_name(), "doh");
        assert_eq!(config.provider_lookup.type_name(), "ipwhois");
    }

    #[test]
    fn hostname_rules() {
        assert!(validate_hostname("example.com").is_ok());
        assert!(validate_hostname("example.com.").is_ok());
        assert!(validate_hostname("a-b.example.com").is_ok());
        assert!(validate_hostname("").is_err());
        assert!(validate_hostname("bad..name").is_err());
        assert!(validate_hostname("-bad.example.com").is_err());
        assert!(validate_hostname("bad_label.example.com").is_err());
        assert!(validate_hostname(&format!("{}.com", "a".repeat(64))).is_err());
    }

    #[test]
    fn rejects_non_http_urls() {
        let resolver = ResolverConfig::Doh {
            url: "ftp://dns.example".to_string(),
            timeout_secs: 10,
        };
        assert!(resolver.validate().is_err());

        let lookup = ProviderLookupConfig::IpWhois {
            url: String::new(),
            timeout_secs: 10,
        };
        assert!(lookup.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let resolver = ResolverConfig::Doh {
            url: DEFAULT_DOH_URL.to_string(),
            timeout_secs: 0,
        };
        assert!(resolver.validate().is_err());

        let workflow = WorkflowConfig {
            min_display_delay_ms: 60_001,
            ..WorkflowConfig::default()
        };
        assert!(workflow.validate().is_err());
    }

    #[test]
    fn typewriter_needs_words() {
        let typewriter = TypewriterConfig {
            words: Vec::new(),
            ..TypewriterConfig::default()
        };
        assert!(typewriter.validate().is_err());
    }

    #[test]
    fn deserializes_tagged_backends() {
        let json = r#"{
            "hostname": "example.org",
            "resolver": { "type": "doh", "url": "https://cloudflare-dns.com/dns-query" },
            "provider_lookup": { "type": "custom", "factory": "static", "config": {} }
        }"#;

        let config: GlanceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hostname, "example.org");
        assert_eq!(config.resolver.type_name(), "doh");
        assert_eq!(config.provider_lookup.type_name(), "static");
        assert_eq!(config.workflow.min_display_delay_ms, 1000);
        assert_eq!(config.typewriter.words.len(), 8);
    }
}
