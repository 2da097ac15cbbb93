//! Domain models for the load pipeline.
//!
//! - [`RowRecord`] - one source row as a field-name to value mapping
//! - [`RecordBatch`] - every row of one source file, in file order
//! - [`Target`] - database and collection the batch is written to

use std::fmt;

use mongodb::bson::{self, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Row Record
// =============================================================================

/// One transformed source row.
///
/// Field order follows the header order of the source file. Values are
/// JSON scalars: string, number, boolean or null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord(Map<String, Value>);

impl RowRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in source column order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert to a BSON document for insertion.
    pub fn into_document(self) -> Result<Document, bson::ser::Error> {
        bson::to_document(&self.0)
    }
}

impl From<Map<String, Value>> for RowRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for RowRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Record Batch
// =============================================================================

/// All records of one source file, in row order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordBatch(Vec<RowRecord>);

impl RecordBatch {
    pub fn new(records: Vec<RowRecord>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowRecord> {
        self.0.iter()
    }

    pub fn records(&self) -> &[RowRecord] {
        &self.0
    }

    pub fn into_records(self) -> Vec<RowRecord> {
        self.0
    }
}

impl IntoIterator for RecordBatch {
    type Item = RowRecord;
    type IntoIter = std::vec::IntoIter<RowRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordBatch {
    type Item = &'a RowRecord;
    type IntoIter = std::slice::Iter<'a, RowRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<RowRecord> for RecordBatch {
    fn from_iter<I: IntoIterator<Item = RowRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// Connection Target
// =============================================================================

/// Destination of a load. Not validated against the store before writing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub database: String,
    pub collection: String,
}

impl Target {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}
