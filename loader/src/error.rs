//! Error types for the bulk load pipeline.
//!
//! Each component has its own closed error enum:
//!
//! - [`DataAccessError`] - the CSV file is missing, unreadable or unparseable
//! - [`StoreError`] - the document store is unreachable or rejected the write
//! - [`ConfigError`] - required settings are missing from the environment
//! - [`EtlError`] - top-level error wrapping all of the above
//!
//! Conversion into [`EtlError`] is automatic via `From` implementations,
//! so `?` works across component boundaries. Callers that need to branch on
//! the failure use [`EtlError::kind`].

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Data Access Errors
// =============================================================================

/// Errors while reading a delimited file into a table.
#[derive(Debug, Error)]
pub enum DataAccessError {
    /// File missing or unreadable.
    #[error("Cannot read file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be decoded as text.
    #[error("Cannot decode file as {encoding}")]
    Encoding { encoding: String },

    /// The delimited parser rejected the input.
    #[error("Invalid CSV at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// No header row at all.
    #[error("No columns to parse from file")]
    NoColumns,

    /// A data row has more cells than the header row.
    #[error("Expected {expected} fields in line {line}, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}

impl From<csv::Error> for DataAccessError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        DataAccessError::Parse {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Endpoint unreachable, TLS handshake or authentication failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The store rejected the insert.
    #[error("Write rejected: {0}")]
    Write(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while assembling [`crate::config::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("Missing {0} environment variable")]
    Missing(&'static str),

    /// Trust-anchor bundle path does not exist.
    #[error("Trust bundle not found: {}", .0.display())]
    TrustBundle(PathBuf),
}

// =============================================================================
// Top-level Error
// =============================================================================

/// Failure category of an [`EtlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataAccess,
    Connection,
    Write,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DataAccess => "data access",
            ErrorKind::Connection => "connection",
            ErrorKind::Write => "write",
            ErrorKind::Config => "config",
        }
    }
}

/// The single error raised to the top of a run.
///
/// Carries the original cause; see [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Data access error: {0}")]
    DataAccess(#[from] DataAccessError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::DataAccess(_) => ErrorKind::DataAccess,
            EtlError::Store(StoreError::Connection(_)) => ErrorKind::Connection,
            EtlError::Store(StoreError::Write(_)) => ErrorKind::Write,
            EtlError::Config(_) => ErrorKind::Config,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reading and transforming.
pub type ReadResult<T> = Result<T, DataAccessError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for a whole run.
pub type EtlResult<T> = Result<T, EtlError>;
