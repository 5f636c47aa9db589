//! Application state for the verification service.
//!
//! The geolocation database path is resolved eagerly at startup and fixed
//! for the process lifetime; handlers share the resolver through this state
//! and never re-derive the path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geofence_lib::{CountryResolver, MaxMindResolver};

/// Error during application state initialization.
#[derive(Debug)]
pub enum AppStateError {
    /// Geolocation database file not found at the configured path.
    DatabaseNotFound(String),
}

impl std::fmt::Display for AppStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseNotFound(path) => {
                write!(f, "geolocation database not found: {}", path)
            }
        }
    }
}

impl std::error::Error for AppStateError {}

/// Shared application state for all axum handlers.
///
/// Cheaply cloneable (`Arc` internally); shared via axum's `State`
/// extractor. Nothing in here is mutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    resolver: Arc<dyn CountryResolver>,
    db_path: PathBuf,
}

impl AppState {
    /// Resolve the database path and build the MaxMind resolver.
    ///
    /// Fails fast when the file is absent so a misconfigured deployment
    /// dies at startup instead of on the first request. The resolver opens
    /// the database per lookup, so this only checks existence.
    pub fn load(db_path: impl AsRef<Path>) -> Result<Self, AppStateError> {
        let db_path = db_path.as_ref();

        if !db_path.exists() {
            return Err(AppStateError::DatabaseNotFound(
                db_path.display().to_string(),
            ));
        }

        tracing::info!(path = %db_path.display(), "geolocation database resolved");

        let resolver = MaxMindResolver::new(db_path);
        Ok(Self::with_resolver(Arc::new(resolver), db_path))
    }

    /// Build state around an arbitrary resolver.
    ///
    /// This is the seam handler tests use to substitute a canned resolver.
    pub fn with_resolver(resolver: Arc<dyn CountryResolver>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                resolver,
                db_path: db_path.into(),
            }),
        }
    }

    /// The country resolver shared by all requests.
    pub fn resolver(&self) -> &dyn CountryResolver {
        self.inner.resolver.as_ref()
    }

    /// Configured database path.
    pub fn db_path(&self) -> &Path {
        &self.inner.db_path
    }

    /// Whether the database file is currently present (readiness signal).
    pub fn database_available(&self) -> bool {
        self.inner.db_path.exists()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("resolver", &self.inner.resolver.name())
            .field("db_path", &self.inner.db_path)
            .finish()
    }
}
