//! Per-column sort options

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use rowsort_core::{ColumnConfig, SortConfig, SortValueProjection, Value};

/// Maps a cell value to the value that is actually compared
pub type SortValueFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Orders two raw cell values, as if ascending
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Column options keyed by column id
pub type ColumnOptionsMap = HashMap<String, ColumnSortOptions>;

/// How a single column takes part in sorting
///
/// When both are set, `compare_fn` wins over `get_sort_value`. A projection
/// that returns a non-comparable value gives the key no ordering signal.
#[derive(Clone, Default)]
pub struct ColumnSortOptions {
    /// Exclude the column from user-driven toggling
    pub disable: bool,
    /// Flip the column's natural order
    pub invert: bool,
    /// Projection applied to both values before comparing
    pub get_sort_value: Option<SortValueFn>,
    /// Custom comparator over the raw values
    pub compare_fn: Option<CompareFn>,
}

impl ColumnSortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn with_sort_value(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.get_sort_value = Some(Arc::new(f));
        self
    }

    pub fn with_compare_fn(
        mut self,
        f: impl Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.compare_fn = Some(Arc::new(f));
        self
    }

    /// Options for a configured column
    pub fn from_config(config: &ColumnConfig) -> Self {
        Self {
            disable: config.disable,
            invert: config.invert,
            get_sort_value: config.sort_value.map(projection),
            compare_fn: None,
        }
    }

    /// Options for every column listed in `config`
    pub fn map_from_config(config: &SortConfig) -> ColumnOptionsMap {
        config
            .columns
            .iter()
            .map(|(column_id, column)| (column_id.clone(), Self::from_config(column)))
            .collect()
    }
}

impl std::fmt::Debug for ColumnSortOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSortOptions")
            .field("disable", &self.disable)
            .field("invert", &self.invert)
            .field("get_sort_value", &self.get_sort_value.is_some())
            .field("compare_fn", &self.compare_fn.is_some())
            .finish()
    }
}

/// Sort-value function for a named projection
pub fn projection(kind: SortValueProjection) -> SortValueFn {
    match kind {
        SortValueProjection::Lowercase => Arc::new(lowercase),
        SortValueProjection::Length => Arc::new(length),
        SortValueProjection::Numeric => Arc::new(numeric),
    }
}

fn lowercase(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        Value::Array(items) => Value::Array(items.iter().map(lowercase).collect()),
        other => other.clone(),
    }
}

fn length(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::Int(s.chars().count() as i64),
        Value::Array(items) => Value::Int(items.len() as i64),
        other => other.clone(),
    }
}

fn numeric(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                Value::Int(n)
            } else if let Ok(n) = trimmed.parse::<f64>() {
                Value::Float(n)
            } else {
                value.clone()
            }
        }
        Value::Array(items) => Value::Array(items.iter().map(numeric).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsort_core::ColumnConfig;

    #[test]
    fn test_projections() {
        let lower = projection(SortValueProjection::Lowercase);
        assert_eq!(lower(&Value::from("AbC")), Value::from("abc"));
        assert_eq!(lower(&Value::from(vec!["X", "y"])), Value::from(vec!["x", "y"]));
        assert_eq!(lower(&Value::Int(3)), Value::Int(3));

        let len = projection(SortValueProjection::Length);
        assert_eq!(len(&Value::from("héllo")), Value::Int(5));
        assert_eq!(len(&Value::from(vec![1, 2, 3])), Value::Int(3));

        let num = projection(SortValueProjection::Numeric);
        assert_eq!(num(&Value::from(" 42 ")), Value::Int(42));
        assert_eq!(num(&Value::from("2.5")), Value::Float(2.5));
        assert_eq!(num(&Value::from("n/a")), Value::from("n/a"));
    }

    #[test]
    fn test_from_config() {
        let options = ColumnSortOptions::from_config(&ColumnConfig {
            disable: true,
            invert: true,
            sort_value: Some(SortValueProjection::Length),
        });
        assert!(options.disable);
        assert!(options.invert);
        assert!(options.get_sort_value.is_some());
        assert!(options.compare_fn.is_none());
    }

    #[test]
    fn test_map_from_config() {
        let mut config = SortConfig::default();
        config.columns.insert(
            "name".to_string(),
            ColumnConfig {
                invert: true,
                ..Default::default()
            },
        );

        let map = ColumnSortOptions::map_from_config(&config);
        assert_eq!(map.len(), 1);
        assert!(map["name"].invert);
    }

    #[test]
    fn test_debug_hides_closures() {
        let options = ColumnSortOptions::new().inverted().with_compare_fn(|a, b| {
            a.to_string().cmp(&b.to_string())
        });
        let debug = format!("{:?}", options);
        assert!(debug.contains("invert: true"));
        assert!(debug.contains("compare_fn: true"));
    }
}
