//! Bulk loader: one connection, one insert-many per batch.

use crate::config::Settings;
use crate::error::EtlResult;
use crate::logs::{Event, Observer};
use crate::models::{RecordBatch, Target};
use crate::store::{Connection, Connector};

/// Writes record batches to a document store.
///
/// Insert-only. There is no retry and no recovery of partially written
/// batches; any failure is returned as is.
pub struct BulkLoader<C: Connector> {
    settings: Settings,
    connector: C,
}

impl<C: Connector> BulkLoader<C> {
    pub fn new(settings: Settings, connector: C) -> Self {
        Self {
            settings,
            connector,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Insert the whole batch into `target`.
    ///
    /// Returns the number of records submitted. The store's acknowledged
    /// count is not checked. An empty batch still opens the connection, so
    /// an unreachable store is reported, but no insert is sent and the
    /// observer gets [`Event::NothingToInsert`] instead of a completion.
    pub fn load(
        &self,
        batch: RecordBatch,
        target: &Target,
        observer: &dyn Observer,
    ) -> EtlResult<usize> {
        observer.notify(&Event::Connecting {
            target: target.clone(),
            uri: self.settings.redacted_url(),
        });

        let mut connection = self
            .connector
            .connect(&self.settings.mongo_url, self.settings.trust_bundle())?;

        let submitted = batch.len();
        if submitted == 0 {
            observer.notify(&Event::NothingToInsert {
                target: target.clone(),
            });
            return Ok(0);
        }

        connection.insert_many(target, batch)?;

        observer.notify(&Event::InsertComplete { count: submitted });
        Ok(submitted)
    }
}
