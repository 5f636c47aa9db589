//! IP literal validation and the allow-list membership decision.

use std::net::IpAddr;

use crate::error::{Error, Result};

/// Parse an IPv4 or IPv6 literal.
///
/// The returned address carries the canonical textual form via its `Display`
/// impl (e.g. `"2001:0db8::0001"` renders as `"2001:db8::1"`).
pub fn parse_ip(input: &str) -> Result<IpAddr> {
    input.parse().map_err(|_| Error::InvalidIpAddress {
        input: input.to_string(),
    })
}

/// True iff `country` matches at least one allow-list entry verbatim.
///
/// Comparison is case-sensitive. An empty allow list never matches, and an
/// unlocated address (empty country name) only matches an explicit empty
/// entry.
pub fn is_allowed(country: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|entry| entry == country)
}
