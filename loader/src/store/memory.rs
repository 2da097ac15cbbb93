//! In-process document store.
//!
//! Connections from one [`MemoryStore`] share its state. Inserts are
//! all-or-nothing: a batch that breaks a unique field leaves the collection
//! untouched.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::rc::Rc;

use serde_json::Value;

use super::{Connection, Connector};
use crate::error::{StoreError, StoreResult};
use crate::models::{RecordBatch, RowRecord, Target};

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<Target, Vec<RowRecord>>,
    unique_fields: HashMap<Target, Vec<String>>,
    unreachable: bool,
    connections: usize,
    insert_calls: usize,
}

/// Shared handle to the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent connect fail.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.borrow_mut().unreachable = unreachable;
    }

    /// Reject documents that repeat a value of `field` in `target`.
    pub fn add_unique_field(&self, target: &Target, field: impl Into<String>) {
        self.inner
            .borrow_mut()
            .unique_fields
            .entry(target.clone())
            .or_default()
            .push(field.into());
    }

    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector {
            store: self.clone(),
        }
    }

    pub fn documents(&self, target: &Target) -> Vec<RowRecord> {
        self.inner
            .borrow()
            .collections
            .get(target)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, target: &Target) -> usize {
        self.inner
            .borrow()
            .collections
            .get(target)
            .map_or(0, Vec::len)
    }

    /// Connections opened so far.
    pub fn connections(&self) -> usize {
        self.inner.borrow().connections
    }

    /// Insert calls received so far, including rejected ones.
    pub fn insert_calls(&self) -> usize {
        self.inner.borrow().insert_calls
    }
}

/// Opens [`MemoryConnection`]s on a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: MemoryStore,
}

impl Connector for MemoryConnector {
    type Conn = MemoryConnection;

    fn connect(&self, _uri: &str, _trust_bundle: Option<&Path>) -> StoreResult<MemoryConnection> {
        let mut inner = self.store.inner.borrow_mut();
        if inner.unreachable {
            return Err(StoreError::Connection(
                "server selection timeout: no reachable servers".to_string(),
            ));
        }
        inner.connections += 1;

        Ok(MemoryConnection {
            store: self.store.clone(),
        })
    }
}

pub struct MemoryConnection {
    store: MemoryStore,
}

impl Connection for MemoryConnection {
    fn insert_many(&mut self, target: &Target, batch: RecordBatch) -> StoreResult<u64> {
        let mut inner = self.store.inner.borrow_mut();
        inner.insert_calls += 1;

        if batch.is_empty() {
            return Err(StoreError::Write("no documents provided".to_string()));
        }

        if let Some(fields) = inner.unique_fields.get(target) {
            let existing = inner.collections.get(target).map(Vec::as_slice).unwrap_or(&[]);
            for field in fields {
                check_unique(target, field, existing, batch.records())?;
            }
        }

        let count = batch.len() as u64;
        inner
            .collections
            .entry(target.clone())
            .or_default()
            .extend(batch);

        Ok(count)
    }
}

fn check_unique(
    target: &Target,
    field: &str,
    existing: &[RowRecord],
    incoming: &[RowRecord],
) -> StoreResult<()> {
    let key = |record: &RowRecord| record.get(field).cloned().unwrap_or(Value::Null).to_string();

    let mut seen: HashSet<String> = existing.iter().map(key).collect();
    for record in incoming {
        let value = key(record);
        if !seen.insert(value.clone()) {
            return Err(StoreError::Write(format!(
                "E11000 duplicate key error collection: {} index: {}_1 dup key: {{ {}: {} }}",
                target, field, field, value
            )));
        }
    }

    Ok(())
}
