//! Request types for the verification endpoint.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Body of `GET /verifyIPAddressInCountries`.
///
/// The endpoint reads a JSON body on GET requests; unusual, but it is the
/// documented protocol of this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// IPv4 or IPv6 literal to locate.
    pub ip_address: String,

    /// Country names the address is allowed to geolocate in. May be empty
    /// or absent, in which case verification always denies.
    #[serde(default)]
    pub allowed_countries: Vec<String>,
}

impl VerificationRequest {
    /// Parse the `ipAddress` field into an address.
    ///
    /// The returned address renders in canonical form, which is what the
    /// response echoes back.
    pub fn parse_ip(&self) -> geofence_lib::Result<IpAddr> {
        geofence_lib::parse_ip(&self.ip_address)
    }
}
