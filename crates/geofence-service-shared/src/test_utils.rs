//! Test utilities for handler testing.
//!
//! Provides canned [`CountryResolver`] implementations and state builders so
//! handler tests never need a real MaxMind database file. Enable the
//! `test-utils` feature to use these from dependent crates.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use geofence_lib::{CountryResolver, Error};

use crate::state::AppState;

/// Resolver mapping every address to one fixed country name.
pub struct StaticResolver {
    country: String,
}

impl StaticResolver {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
        }
    }
}

impl CountryResolver for StaticResolver {
    fn country_of(&self, _ip: IpAddr) -> geofence_lib::Result<String> {
        Ok(self.country.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Resolver failing the way a missing database file fails.
pub struct FailingResolver {
    path: PathBuf,
}

impl FailingResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CountryResolver for FailingResolver {
    fn country_of(&self, _ip: IpAddr) -> geofence_lib::Result<String> {
        Err(Error::DatabaseNotFound {
            path: self.path.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// State whose resolver returns `country` for every address.
pub fn test_state(country: &str) -> AppState {
    AppState::with_resolver(
        Arc::new(StaticResolver::new(country)),
        "/nonexistent/geoip-test.mmdb",
    )
}

/// State whose resolver always fails as if the database at `path` were
/// missing.
pub fn failing_state(path: &str) -> AppState {
    AppState::with_resolver(Arc::new(FailingResolver::new(path)), path)
}
