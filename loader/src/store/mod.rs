//! Document store capability used by the bulk loader.
//!
//! A [`Connector`] opens one [`Connection`] per load; the connection is
//! released when it goes out of scope, on success and on error alike.
//!
//! - [`mongo`] - MongoDB through the blocking driver
//! - [`memory`] - in-process store for dry runs and tests

pub mod memory;
pub mod mongo;

use std::path::Path;

use crate::error::StoreResult;
use crate::models::{RecordBatch, Target};

pub use memory::{MemoryConnector, MemoryStore};
pub use mongo::MongoConnector;

/// Opens connections to a document store.
pub trait Connector {
    type Conn: Connection;

    /// Connect and authenticate. `uri` is passed through to the driver
    /// untouched; `trust_bundle` is the CA file used to verify the server.
    fn connect(&self, uri: &str, trust_bundle: Option<&Path>) -> StoreResult<Self::Conn>;
}

/// An open connection.
pub trait Connection {
    /// Insert every record of `batch` into `target` in one call.
    ///
    /// Returns the number of documents the store acknowledged. Databases
    /// and collections are created by the store on first write.
    fn insert_many(&mut self, target: &Target, batch: RecordBatch) -> StoreResult<u64>;
}
