//! Declarative sort configuration
//!
//! A `SortConfig` is usually loaded from a TOML file and carries everything
//! the sort controller needs at construction time: the initial key sequence,
//! the toggle behaviour, and per-column options that can be expressed without
//! code (`disable`, `invert`, and a named sort-value projection).
//!
//! ```toml
//! initial_sort_keys = [{ column_id = "age", direction = "desc" }]
//! toggle_order = ["asc", "desc", "unsorted"]
//!
//! [columns.name]
//! sort_value = "lowercase"
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::{Result, RowsortError, SortKey, ToggleOrder};

/// How strings are ordered against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringCollation {
    /// Unicode scalar value order, independent of locale
    #[default]
    Lexical,
    /// Lowercased comparison, ties broken lexically
    CaseInsensitive,
}

/// Keyboard modifier that turns a header toggle into a multi-sort toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    #[default]
    Shift,
    Control,
    Alt,
    Meta,
}

/// Named replacements for a code-supplied sort-value function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortValueProjection {
    /// Lowercase strings (and strings inside arrays)
    Lowercase,
    /// Length of a string (in chars) or an array
    Length,
    /// Parse numeric strings into numbers
    Numeric,
}

/// Per-column options that can live in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// Exclude the column from user-driven toggling
    #[serde(default)]
    pub disable: bool,
    /// Flip the column's natural order
    #[serde(default)]
    pub invert: bool,
    /// Project values before comparing them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_value: Option<SortValueProjection>,
}

/// Sort configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Key sequence in effect before any user interaction
    #[serde(default)]
    pub initial_sort_keys: Vec<SortKey>,
    /// Always toggle in single-sort mode
    #[serde(default)]
    pub disable_multi_sort: bool,
    /// Per-column toggle cycle
    #[serde(default)]
    pub toggle_order: ToggleOrder,
    /// Modifier that requests multi-sort when no custom predicate is set
    #[serde(default)]
    pub multi_sort_modifier: ModifierKey,
    /// Rows arrive already sorted; only track keys
    #[serde(default)]
    pub server_side: bool,
    /// String ordering used by the comparator
    #[serde(default)]
    pub string_collation: StringCollation,
    /// Reject forests deeper than this many levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Column options keyed by column id
    #[serde(default)]
    pub columns: IndexMap<String, ColumnConfig>,
}

impl SortConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: SortConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(
            path = %path.display(),
            initial_keys = config.initial_sort_keys.len(),
            columns = config.columns.len(),
            "Loaded sort configuration"
        );
        Ok(config)
    }

    /// Check value constraints and drop duplicate initial keys
    pub fn validate(&mut self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(RowsortError::Configuration(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.initial_sort_keys.iter().any(|k| k.column_id.is_empty()) {
            return Err(RowsortError::Configuration(
                "initial sort key has an empty column id".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        self.initial_sort_keys.retain(|key| {
            let first = seen.insert(key.column_id.clone());
            if !first {
                tracing::warn!(
                    column_id = %key.column_id,
                    "Dropping duplicate initial sort key"
                );
            }
            first
        });
        Ok(())
    }

    /// Options for a column, defaulted when the column is not configured
    pub fn column(&self, column_id: &str) -> ColumnConfig {
        self.columns.get(column_id).cloned().unwrap_or_default()
    }
}
