//! Errors raised by route store backends.

#[cfg(feature = "store-sqlite")]
use std::path::PathBuf;

use thiserror::Error;

use super::RouteCode;

/// A route store backend rejected a read or a write.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite route store at {path}: {source}")]
    Open {
        /// Location of the database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A SQLite statement failed.
    #[cfg(feature = "store-sqlite")]
    #[error("SQLite route store failed to {operation}: {source}")]
    Sqlite {
        /// What the store was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A route could not be encoded for storage.
    #[cfg(feature = "serde")]
    #[error("failed to encode route {code}: {source}")]
    Encode {
        /// Code being written.
        code: RouteCode,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored payload could not be decoded.
    #[cfg(feature = "serde")]
    #[error("failed to decode stored route {code}: {source}")]
    Decode {
        /// Code being read.
        code: RouteCode,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A live route already uses the code.
    #[error("route code {code} is already in use")]
    CodeInUse {
        /// The conflicting code.
        code: RouteCode,
    },
    /// A thread panicked while holding the store lock.
    #[error("route store lock was poisoned")]
    Poisoned,
    /// A timestamp could not be represented by the backend.
    #[error("timestamp is outside the range the route store can represent")]
    InvalidTimestamp,
    /// Any other backend failure.
    #[error("route store backend failed: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}
