//! Core types for rowsort

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A cell value
///
/// Only `Int`, `Float`, `String` and arrays made entirely of those are
/// comparable. Every other variant gives a sort key no ordering signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Multi-valued cell
    Array(Vec<Value>),
    /// Arbitrary structured value
    Json(serde_json::Value),
}

impl Value {
    /// Check if the value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64 (integers are widened)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether the value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Whether the value can be ordered without a custom comparator.
    pub fn is_comparable(&self) -> bool {
        match self {
            Value::Int(_) | Value::Float(_) | Value::String(_) => true,
            Value::Array(items) => items.iter().all(Value::is_comparable),
            Value::Null | Value::Bool(_) | Value::Json(_) => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Array(items) => {
                write!(f, "[")?;
                for (ix, item) in items.iter().enumerate() {
                    if ix > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// A single cell of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// A cell backed by row data
    Data { value: Value },
    /// A presentational cell (actions, checkboxes, ...) with no data behind it
    Display {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
}

impl Cell {
    /// Create a data cell
    pub fn data(value: impl Into<Value>) -> Self {
        Cell::Data {
            value: value.into(),
        }
    }

    /// Create a display cell
    pub fn display(label: Option<String>) -> Self {
        Cell::Display { label }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Cell::Data { .. })
    }

    /// The data value, if this is a data cell
    pub fn value(&self) -> Option<&Value> {
        match self {
            Cell::Data { value } => Some(value),
            Cell::Display { .. } => None,
        }
    }
}

/// A row of the forest being sorted
///
/// The cell mapping sits behind an `Arc` so that re-ordered copies of a row
/// share it with the original instead of deep-copying cell data. `Clone`,
/// `PartialEq` and `Drop` walk the subtree with an explicit stack, so forest
/// depth is bounded by memory rather than by the call stack.
#[derive(Debug, Serialize, Deserialize)]
pub struct Row {
    /// Row identifier
    pub id: String,
    /// Cells keyed by column id
    cells: Arc<IndexMap<String, Cell>>,
    /// Child rows, absent for leaf rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_rows: Option<Vec<Row>>,
}

impl Row {
    /// Create a leaf row
    pub fn new(id: impl Into<String>, cells: IndexMap<String, Cell>) -> Self {
        Self {
            id: id.into(),
            cells: Arc::new(cells),
            sub_rows: None,
        }
    }

    /// Create a leaf row whose cells are all data cells
    pub fn from_values<K, V>(
        id: impl Into<String>,
        values: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let cells = values
            .into_iter()
            .map(|(k, v)| (k.into(), Cell::data(v)))
            .collect();
        Self::new(id, cells)
    }

    /// Add or replace a cell
    pub fn with_cell(mut self, column_id: impl Into<String>, cell: Cell) -> Self {
        Arc::make_mut(&mut self.cells).insert(column_id.into(), cell);
        self
    }

    /// Attach child rows
    pub fn with_sub_rows(mut self, sub_rows: Vec<Row>) -> Self {
        self.sub_rows = Some(sub_rows);
        self
    }

    /// Get a cell by column id
    pub fn cell(&self, column_id: &str) -> Option<&Cell> {
        self.cells.get(column_id)
    }

    /// Get a data value by column id
    pub fn value(&self, column_id: &str) -> Option<&Value> {
        self.cell(column_id).and_then(Cell::value)
    }

    /// All cells, in column order
    pub fn cells(&self) -> &IndexMap<String, Cell> {
        &self.cells
    }

    /// Child rows, if this row has any
    pub fn sub_rows(&self) -> Option<&[Row]> {
        self.sub_rows.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        self.sub_rows.is_none()
    }

    /// A copy of this row with `sub_rows` replaced; the cells are shared.
    pub fn with_replaced_sub_rows(&self, sub_rows: Option<Vec<Row>>) -> Self {
        Self {
            id: self.id.clone(),
            cells: Arc::clone(&self.cells),
            sub_rows,
        }
    }

    /// Whether both rows point at the same cell storage
    pub fn shares_cells_with(&self, other: &Row) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }

    /// Returns an iterator over this row and all descendants (depth-first)
    pub fn iter(&self) -> RowIterator<'_> {
        RowIterator::new(std::slice::from_ref(self))
    }

    /// Number of levels in this subtree (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((row, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in row.sub_rows().unwrap_or_default() {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }
}

impl Clone for Row {
    fn clone(&self) -> Self {
        self.with_replaced_sub_rows(self.sub_rows().map(clone_forest))
    }
}

/// Copy a forest bottom-up; cells stay shared
fn clone_forest(forest: &[Row]) -> Vec<Row> {
    enum Step<'a> {
        Enter(&'a Row),
        Exit(&'a Row, usize),
    }

    // Finished copies; a row's children are the last `count` entries on exit
    let mut done: Vec<Row> = Vec::with_capacity(forest.len());
    let mut stack: Vec<Step<'_>> = forest.iter().rev().map(Step::Enter).collect();
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(row) => match row.sub_rows() {
                Some(children) => {
                    stack.push(Step::Exit(row, children.len()));
                    stack.extend(children.iter().rev().map(Step::Enter));
                }
                None => done.push(row.with_replaced_sub_rows(None)),
            },
            Step::Exit(row, count) => {
                let children = done.split_off(done.len() - count);
                done.push(row.with_replaced_sub_rows(Some(children)));
            }
        }
    }
    done
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.id != b.id || a.cells != b.cells {
                return false;
            }
            match (a.sub_rows(), b.sub_rows()) {
                (None, None) => {}
                (Some(xs), Some(ys)) if xs.len() == ys.len() => stack.extend(xs.iter().zip(ys)),
                _ => return false,
            }
        }
        true
    }
}

impl Drop for Row {
    fn drop(&mut self) {
        let Some(mut pending) = self.sub_rows.take() else {
            return;
        };
        while let Some(mut row) = pending.pop() {
            if let Some(children) = row.sub_rows.take() {
                pending.extend(children);
            }
        }
    }
}

/// Depth-first iterator over a forest
pub struct RowIterator<'a> {
    stack: Vec<&'a Row>,
}

impl<'a> RowIterator<'a> {
    /// Iterate over every row of `forest`, parents before children
    pub fn new(forest: &'a [Row]) -> Self {
        Self {
            stack: forest.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for RowIterator<'a> {
    type Item = &'a Row;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.stack.pop()?;
        // Push children in reverse order so we visit them in order
        for child in row.sub_rows().unwrap_or_default().iter().rev() {
            self.stack.push(child);
        }
        Some(row)
    }
}
