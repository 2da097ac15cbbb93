//! MongoDB connector using the driver's blocking API.

use std::path::Path;
use std::time::Duration;

use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind as MongoErrorKind};
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::sync::Client;

use super::{Connection, Connector};
use crate::error::{StoreError, StoreResult};
use crate::models::{RecordBatch, Target};

/// Applied to both connect and server selection.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const APP_NAME: &str = "bulkload";

/// Opens [`MongoConnection`]s.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    timeout: Duration,
}

impl MongoConnector {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client_options(&self, uri: &str, trust_bundle: Option<&Path>) -> StoreResult<ClientOptions> {
        let mut options = ClientOptions::parse(uri)
            .run()
            .map_err(|e| StoreError::Connection(format!("invalid connection string: {}", e)))?;

        // Always TLS; the bundle only replaces the platform roots.
        let mut tls = TlsOptions::default();
        tls.ca_file_path = trust_bundle.map(Path::to_path_buf);
        options.tls = Some(Tls::Enabled(tls));

        options.connect_timeout = Some(self.timeout);
        options.server_selection_timeout = Some(self.timeout);
        options.app_name.get_or_insert_with(|| APP_NAME.to_string());

        Ok(options)
    }
}

impl Default for MongoConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MongoConnector {
    type Conn = MongoConnection;

    fn connect(&self, uri: &str, trust_bundle: Option<&Path>) -> StoreResult<MongoConnection> {
        let options = self.client_options(uri, trust_bundle)?;
        let client = Client::with_options(options)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // The driver connects lazily; ping so that an unreachable server or
        // bad credentials fail here and never during the insert.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(MongoConnection { client })
    }
}

/// A live client. Dropping it closes its sockets.
pub struct MongoConnection {
    client: Client,
}

impl Connection for MongoConnection {
    fn insert_many(&mut self, target: &Target, batch: RecordBatch) -> StoreResult<u64> {
        let documents = batch
            .into_iter()
            .map(|record| {
                record
                    .into_document()
                    .map_err(|e| StoreError::Write(format!("malformed document: {}", e)))
            })
            .collect::<StoreResult<Vec<Document>>>()?;

        let collection = self
            .client
            .database(&target.database)
            .collection::<Document>(&target.collection);

        let result = collection.insert_many(documents).run().map_err(classify)?;

        Ok(result.inserted_ids.len() as u64)
    }
}

/// Split driver errors into connection and write failures.
fn classify(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        MongoErrorKind::ServerSelection { .. }
        | MongoErrorKind::Authentication { .. }
        | MongoErrorKind::DnsResolve { .. }
        | MongoErrorKind::ConnectionPoolCleared { .. }
        | MongoErrorKind::Io(_) => StoreError::Connection(err.to_string()),
        _ => StoreError::Write(err.to_string()),
    }
}
