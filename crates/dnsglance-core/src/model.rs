//! Data model for one resolution activation
//!
//! Nothing here outlives a single activation: records are built while the
//! workflow runs and replaced wholesale by the next one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// DNS record type queried by the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// Both families, in display order
    pub const ALL: [RecordType; 2] = [RecordType::A, RecordType::Aaaa];

    /// Name used in DoH query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }

    /// Numeric RR type (RFC 1035 / RFC 3596)
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::Aaaa => 28,
        }
    }

    /// Whether `ip` belongs to this record's address family
    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            RecordType::A => ip.is_ipv4(),
            RecordType::Aaaa => ip.is_ipv6(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolved address and the network provider that owns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    /// Resolved address
    pub ip: IpAddr,
    /// ISP or organization label, `None` when the lookup failed
    pub provider: Option<String>,
}

impl ResolutionRecord {
    /// Create a new resolution record
    pub fn new(ip: IpAddr, provider: Option<String>) -> Self {
        Self { ip, provider }
    }
}

/// Resolved addresses grouped by record type
///
/// Order within each list is the order the upstream resolver answered in.
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSet {
    /// IPv4 records
    pub a: Vec<ResolutionRecord>,
    /// IPv6 records
    pub aaaa: Vec<ResolutionRecord>,
}

impl AddressSet {
    /// Records for one family
    pub fn records(&self, record_type: RecordType) -> &[ResolutionRecord] {
        match record_type {
            RecordType::A => &self.a,
            RecordType::Aaaa => &self.aaaa,
        }
    }

    /// True when neither family has any record
    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.aaaa.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_codes() {
        assert_eq!(RecordType::A.code(), 1);
        assert_eq!(RecordType::Aaaa.code(), 28);
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
    }

    #[test]
    fn record_type_matches_family() {
        let v4: IpAddr = "192.0.2.1".parse().unwrap();
        let v6: IpAddr = "2001:db8::1".parse().unwrap();

        assert!(RecordType::A.matches(&v4));
        assert!(!RecordType::A.matches(&v6));
        assert!(RecordType::Aaaa.matches(&v6));
    }

    #[test]
    fn address_set_selects_family() {
        let set = AddressSet {
            a: vec![ResolutionRecord::new("192.0.2.1".parse().unwrap(), None)],
            aaaa: Vec::new(),
        };

        assert_eq!(set.records(RecordType::A).len(), 1);
        assert!(set.records(RecordType::Aaaa).is_empty());
        assert!(!set.is_empty());
        assert!(AddressSet::default().is_empty());
    }
}
