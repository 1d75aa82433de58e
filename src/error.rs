//! Crate error type.
//!
//! The ingestion core (parser, header normalizer, record builder, filter
//! engine, facets) never fails. Errors only come from the I/O edges: the
//! fetch boundary, the persistence collaborator, configuration, and the JSON
//! layer used by the front ends.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Transport failure while fetching the published table
    #[error("Network error: {0}")]
    Network(String),

    /// The table endpoint answered with a non-success status
    #[error("HTTP error {status} fetching {url}")]
    Http { status: u16, url: String },

    /// Persistence collaborator failure that is not a SQLite error
    #[error("Storage error: {0}")]
    Storage(String),

    #[cfg(feature = "store")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input handed to the JSON layer (not a malformed table row)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
