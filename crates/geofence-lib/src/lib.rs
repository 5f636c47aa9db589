//! Geofence library entry points.
//!
//! This crate exposes the IP-to-country resolution capability backed by a
//! MaxMind database file, together with the allow-list membership decision.
//! Higher-level consumers (the HTTP service) should only depend on the items
//! exported here instead of reimplementing behavior.

#![deny(warnings)]

pub mod error;
pub mod geoip;
pub mod verify;

pub use error::{Error, Result};
pub use geoip::{CountryResolver, MaxMindResolver};
pub use verify::{is_allowed, parse_ip};
