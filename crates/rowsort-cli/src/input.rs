//! JSON row records
//!
//! The command line reads and writes a flat record form that is easier to
//! author by hand than the tagged cell encoding:
//!
//! ```json
//! { "id": "r1", "cells": { "name": "Amy", "menu": "..." }, "display": ["menu"],
//!   "sub_rows": [] }
//! ```

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use rowsort_core::{Cell, Row, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    pub id: String,
    #[serde(default)]
    pub cells: IndexMap<String, Value>,
    /// Columns whose cells are display-only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_rows: Option<Vec<RowRecord>>,
}

impl RowRecord {
    /// Nesting is bounded by serde_json's recursion limit
    pub fn into_row(self) -> Row {
        let mut cells = IndexMap::with_capacity(self.cells.len());
        for (column_id, value) in self.cells {
            let cell = if self.display.contains(&column_id) {
                let label = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                };
                Cell::display(label)
            } else {
                Cell::data(value)
            };
            cells.insert(column_id, cell);
        }
        for column_id in self.display {
            cells.entry(column_id).or_insert(Cell::display(None));
        }

        let row = Row::new(self.id, cells);
        match self.sub_rows {
            Some(children) => row.with_sub_rows(children.into_iter().map(Self::into_row).collect()),
            None => row,
        }
    }

    pub fn from_row(row: &Row) -> Self {
        let mut cells = IndexMap::with_capacity(row.cells().len());
        let mut display = Vec::new();
        for (column_id, cell) in row.cells() {
            match cell {
                Cell::Data { value } => {
                    cells.insert(column_id.clone(), value.clone());
                }
                Cell::Display { label } => {
                    let label = label.clone().map(Value::String).unwrap_or(Value::Null);
                    cells.insert(column_id.clone(), label);
                    display.push(column_id.clone());
                }
            }
        }

        Self {
            id: row.id.clone(),
            cells,
            display,
            sub_rows: row
                .sub_rows()
                .map(|children| children.iter().map(Self::from_row).collect()),
        }
    }
}

/// Parse a JSON array of records into a forest
pub fn parse_rows(source: &str) -> anyhow::Result<Vec<Row>> {
    let records: Vec<RowRecord> =
        serde_json::from_str(source).context("Row data is not a JSON array of row records")?;
    Ok(records.into_iter().map(RowRecord::into_row).collect())
}

/// Read rows from a file, or stdin for `None` and `-`
pub fn read_rows(path: Option<&Path>) -> anyhow::Result<Vec<Row>> {
    let source = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rows from {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read rows from stdin")?;
            buffer
        }
    };

    let rows = parse_rows(&source)?;
    tracing::debug!(roots = rows.len(), "Read row forest");
    Ok(rows)
}
