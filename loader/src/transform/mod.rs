//! Table to record conversion.
//!
//! One [`RowRecord`] per table row, in file order. Column names are kept as
//! they are and values carry the type inferred for their column; nothing
//! is renamed, filtered or coerced beyond that.

pub mod pipeline;

use std::path::Path;

use serde_json::Map;

use crate::error::ReadResult;
use crate::models::{RecordBatch, RowRecord};
use crate::parser::infer::{convert_cell, infer_columns};
use crate::parser::{read_table, ReadOptions, Table};

/// Convert a parsed table into a record batch.
pub fn records_from_table(table: Table) -> RecordBatch {
    let types = infer_columns(&table);
    let Table { headers, rows } = table;

    rows.into_iter()
        .map(|row| {
            let mut map = Map::with_capacity(headers.len());
            for ((header, column_type), cell) in headers.iter().zip(&types).zip(row) {
                map.insert(header.clone(), convert_cell(cell.as_deref(), *column_type));
            }
            RowRecord::from(map)
        })
        .collect()
}

/// Read a CSV file and convert every row to a record.
pub fn csv_to_records<P: AsRef<Path>>(path: P, options: &ReadOptions) -> ReadResult<RecordBatch> {
    let table = read_table(path, options)?;
    Ok(records_from_table(table))
}
