//! IP-to-country resolution backed by a MaxMind database file.
//!
//! The service treats resolution as an opaque capability behind the
//! [`CountryResolver`] trait so handlers can be tested without a real
//! database file.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use maxminddb::{geoip2, Reader};
use tracing::trace;

use crate::error::Result;

/// Capability resolving an IP address to a country name.
///
/// Implementations must be safe to call concurrently; the service shares one
/// resolver across all in-flight requests.
pub trait CountryResolver: Send + Sync {
    /// Resolve `ip` to an English-language country name.
    ///
    /// An address the database has no record for resolves to an empty
    /// string; only environment failures (missing file, corrupt data,
    /// lookup-internal errors) are errors.
    fn country_of(&self, ip: IpAddr) -> Result<String>;

    /// Resolver name for logs.
    fn name(&self) -> &'static str;
}

/// Country resolver reading a local MaxMind database.
///
/// Holds only the database path. The reader is opened and closed per call so
/// no file handle outlives a single request; repeated open overhead is the
/// accepted cost of that isolation.
#[derive(Debug, Clone)]
pub struct MaxMindResolver {
    path: PathBuf,
}

impl MaxMindResolver {
    /// Create a resolver for the database at `path`.
    ///
    /// The file is not touched here; a missing or corrupt database surfaces
    /// on the first lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CountryResolver for MaxMindResolver {
    fn country_of(&self, ip: IpAddr) -> Result<String> {
        let reader = Reader::open_readfile(&self.path)?;

        let result = reader.lookup(ip)?;
        let record: Option<geoip2::Country> = result.decode()?;

        let country = record
            .and_then(|r| r.country.names.english.map(String::from))
            .unwrap_or_default();

        trace!(ip = %ip, country = %country, "maxmind lookup");

        Ok(country)
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
