use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the geofence library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Geolocation database could not be located at the resolved path.
    #[error("geolocation database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// Raised when an input string is not an IPv4 or IPv6 literal.
    #[error("not a valid IP address: {input}")]
    InvalidIpAddress { input: String },

    /// Wrapper for MaxMind database errors (open, read, decode).
    #[error(transparent)]
    MaxMind(#[from] maxminddb::MaxMindDbError),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
