//! # Bulkload - CSV to MongoDB loader
//!
//! Reads a CSV file, turns every row into a JSON document and inserts the
//! whole batch into a MongoDB collection with one insert-many.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│ BulkLoader  │
//! │             │     │ (typed cols)│     │ (1 doc/row) │     │ (insertMany)│
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy
//! - [`config`] - Settings from the environment
//! - [`models`] - RowRecord, RecordBatch, Target
//! - [`parser`] - CSV reading and column type inference
//! - [`transform`] - Table to records, and the end-to-end pipeline
//! - [`store`] - Document store connectors
//! - [`loader`] - Bulk loader
//! - [`logs`] - Pipeline events and observers

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Reading
pub mod parser;
pub mod transform;

// Writing
pub mod loader;
pub mod store;

// Observability
pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{log_file_from_env, redact_uri, Settings};

pub use error::{
    ConfigError, DataAccessError, ErrorKind, EtlError, EtlResult, ReadResult, StoreError,
    StoreResult,
};

pub use models::{RecordBatch, RowRecord, Target};

pub use parser::{
    detect_delimiter, detect_encoding, decode_content, parse_table, read_table, Delimiter,
    Encoding, ReadOptions, Table,
};

pub use transform::{csv_to_records, pipeline::run, records_from_table};

pub use loader::BulkLoader;

pub use store::{Connection, Connector, MemoryConnector, MemoryStore, MongoConnector};

pub use logs::{ConsoleLog, Event, LogEntry, LogLevel, NoopObserver, Observer};
