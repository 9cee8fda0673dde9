//! rowsort core - shared types for the hierarchical sort engine
//!
//! This crate provides the data model every other rowsort crate depends on:
//!
//! - `Value`, `Cell` and `Row` - the hierarchical row forest being sorted
//! - `SortDirection`, `SortKey` and `ToggleOrder` - sort key vocabulary
//! - `SortConfig` - TOML-loadable sort configuration
//! - `RowsortError` - the crate-wide error type

pub mod config;
mod error;
mod sort_key;
mod types;

pub use config::{ColumnConfig, ModifierKey, SortConfig, SortValueProjection, StringCollation};
pub use error::*;
pub use sort_key::*;
pub use types::*;
