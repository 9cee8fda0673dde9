//! Active sort keys and their toggle state machine
//!
//! Each column cycles through the configured `ToggleOrder`, by default
//! `absent -> asc -> desc -> absent`. In multi-sort mode the other keys are
//! left alone; in single-sort mode entering a column's cycle drops every
//! other key.

use rowsort_core::{SortDirection, SortKey, ToggleOrder};
use serde::{Deserialize, Serialize};

/// Ordered, column-unique list of sort keys (first = highest priority)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SortKey>", into = "Vec<SortKey>")]
pub struct SortKeySequence {
    keys: Vec<SortKey>,
}

impl SortKeySequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence, keeping the first key for any repeated column
    pub fn from_keys(keys: impl IntoIterator<Item = SortKey>) -> Self {
        let mut sequence = Self::new();
        sequence.set(keys);
        sequence
    }

    /// Replace every key
    pub fn set(&mut self, keys: impl IntoIterator<Item = SortKey>) {
        self.keys.clear();
        for key in keys {
            if self.position(&key.column_id).is_some() {
                tracing::warn!(column_id = %key.column_id, "Ignoring duplicate sort key");
                continue;
            }
            self.keys.push(key);
        }
    }

    /// Get the keys in priority order
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Priority index of a column's key
    pub fn position(&self, column_id: &str) -> Option<usize> {
        self.keys.iter().position(|k| k.column_id == column_id)
    }

    /// Direction a column is currently sorted in
    pub fn current_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.keys
            .iter()
            .find(|k| k.column_id == column_id)
            .map(|k| k.direction)
    }

    /// Advance a column through the default `asc -> desc -> absent` cycle
    pub fn toggle(&mut self, column_id: &str, multi_sort: bool) -> Option<SortDirection> {
        self.toggle_with_order(column_id, multi_sort, &ToggleOrder::default())
    }

    /// Advance a column through `order`, returning its new direction
    ///
    /// Single-sort mode leaves at most this column in the sequence. Multi-sort
    /// mode appends new keys at the lowest priority, updates existing ones in
    /// place, and removes keys whose next state is "unsorted".
    pub fn toggle_with_order(
        &mut self,
        column_id: &str,
        multi_sort: bool,
        order: &ToggleOrder,
    ) -> Option<SortDirection> {
        let current_ix = self.position(column_id);
        let current = current_ix.map(|ix| self.keys[ix].direction);
        let next = order.next(current);

        if multi_sort {
            match (current_ix, next) {
                (None, Some(direction)) => self.keys.push(SortKey::new(column_id, direction)),
                (None, None) => {}
                (Some(ix), Some(direction)) => self.keys[ix].direction = direction,
                (Some(ix), None) => {
                    self.keys.remove(ix);
                }
            }
        } else {
            self.keys.clear();
            if let Some(direction) = next {
                self.keys.push(SortKey::new(column_id, direction));
            }
        }

        tracing::debug!(
            column_id,
            multi_sort,
            from = ?current,
            to = ?next,
            active_keys = self.keys.len(),
            "Toggled sort key"
        );
        next
    }

    /// Remove a column's key; returns whether one was present
    pub fn clear(&mut self, column_id: &str) -> bool {
        match self.position(column_id) {
            Some(ix) => {
                self.keys.remove(ix);
                tracing::debug!(column_id, "Cleared sort key");
                true
            }
            None => false,
        }
    }

    /// Remove every key
    pub fn clear_all(&mut self) {
        self.keys.clear();
    }
}

impl From<Vec<SortKey>> for SortKeySequence {
    fn from(keys: Vec<SortKey>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<SortKeySequence> for Vec<SortKey> {
    fn from(sequence: SortKeySequence) -> Self {
        sequence.keys
    }
}

impl<'a> IntoIterator for &'a SortKeySequence {
    type Item = &'a SortKey;
    type IntoIter = std::slice::Iter<'a, SortKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl std::fmt::Display for SortKeySequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (ix, key) in self.keys.iter().enumerate() {
            if ix > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn seq(keys: &[SortKey]) -> SortKeySequence {
        SortKeySequence::from_keys(keys.iter().cloned())
    }

    #[test]
    fn test_multi_sort_three_state_cycle() {
        let mut keys = SortKeySequence::new();

        assert_eq!(keys.toggle("age", true), Some(SortDirection::Asc));
        assert_eq!(keys, seq(&[SortKey::asc("age")]));

        assert_eq!(keys.toggle("age", true), Some(SortDirection::Desc));
        assert_eq!(keys, seq(&[SortKey::desc("age")]));

        assert_eq!(keys.toggle("age", true), None);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_single_sort_replaces_other_keys() {
        let mut keys = seq(&[SortKey::asc("age")]);
        keys.toggle("name", false);
        assert_eq!(keys, seq(&[SortKey::asc("name")]));
    }

    #[test]
    fn test_single_sort_cycle() {
        let mut keys = seq(&[SortKey::asc("age"), SortKey::desc("name")]);

        keys.toggle("age", false);
        assert_eq!(keys, seq(&[SortKey::desc("age")]));

        keys.toggle("age", false);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_single_sort_on_desc_clears_everything() {
        let mut keys = seq(&[SortKey::asc("age"), SortKey::desc("name")]);
        keys.toggle("name", false);
        assert!(keys.is_empty());
    }

    #[test]
    fn test_multi_sort_appends_at_lowest_priority() {
        let mut keys = seq(&[SortKey::desc("age")]);
        keys.toggle("name", true);
        assert_eq!(keys, seq(&[SortKey::desc("age"), SortKey::asc("name")]));
    }

    #[test]
    fn test_multi_sort_flips_in_place() {
        let mut keys = seq(&[SortKey::asc("a"), SortKey::asc("b"), SortKey::asc("c")]);
        keys.toggle("b", true);
        assert_eq!(
            keys,
            seq(&[SortKey::asc("a"), SortKey::desc("b"), SortKey::asc("c")])
        );
    }

    #[test]
    fn test_multi_sort_removal_preserves_order() {
        let mut keys = seq(&[SortKey::asc("a"), SortKey::desc("b"), SortKey::asc("c")]);
        keys.toggle("b", true);
        assert_eq!(keys, seq(&[SortKey::asc("a"), SortKey::asc("c")]));
    }

    #[test]
    fn test_clear() {
        let mut keys = seq(&[SortKey::asc("a"), SortKey::desc("b"), SortKey::asc("c")]);

        assert!(keys.clear("b"));
        assert_eq!(keys, seq(&[SortKey::asc("a"), SortKey::asc("c")]));

        assert!(!keys.clear("unknown"));
        assert_eq!(keys.len(), 2);

        keys.clear_all();
        assert!(keys.is_empty());
    }

    #[test]
    fn test_current_direction() {
        let keys = seq(&[SortKey::asc("a"), SortKey::desc("b")]);
        assert_eq!(keys.current_direction("a"), Some(SortDirection::Asc));
        assert_eq!(keys.current_direction("b"), Some(SortDirection::Desc));
        assert_eq!(keys.current_direction("c"), None);
        assert_eq!(keys.position("b"), Some(1));
    }

    #[test]
    fn test_set_drops_duplicate_columns() {
        let keys = seq(&[SortKey::desc("a"), SortKey::asc("b"), SortKey::asc("a")]);
        assert_eq!(keys.keys(), &[SortKey::desc("a"), SortKey::asc("b")]);
    }

    #[test]
    fn test_custom_toggle_order() {
        let order = ToggleOrder::new(vec![Some(SortDirection::Desc), Some(SortDirection::Asc)])
            .unwrap();
        let mut keys = SortKeySequence::new();

        keys.toggle_with_order("age", true, &order);
        assert_eq!(keys.current_direction("age"), Some(SortDirection::Desc));
        keys.toggle_with_order("age", true, &order);
        assert_eq!(keys.current_direction("age"), Some(SortDirection::Asc));
        keys.toggle_with_order("age", true, &order);
        assert_eq!(keys.current_direction("age"), Some(SortDirection::Desc));
    }

    #[test]
    fn test_toggle_order_starting_unsorted_leaves_absent_column_absent() {
        let order = ToggleOrder::new(vec![None, Some(SortDirection::Asc)]).unwrap();
        let mut keys = seq(&[SortKey::asc("b")]);

        // absent is "unsorted", whose successor is asc
        keys.toggle_with_order("a", true, &order);
        assert_eq!(keys, seq(&[SortKey::asc("b"), SortKey::asc("a")]));
        keys.toggle_with_order("a", true, &order);
        assert_eq!(keys, seq(&[SortKey::asc("b")]));
    }

    #[test]
    fn test_keys_stay_unique_under_any_toggle_sequence() {
        let columns = ["a", "b", "c", "d"];
        let mut keys = SortKeySequence::new();

        // Deterministic walk over mixed toggles and clears
        for step in 0..200usize {
            let column = columns[(step * 7 + step / 3) % columns.len()];
            match step % 5 {
                0 => {
                    keys.clear(column);
                }
                1 => {
                    keys.toggle(column, false);
                }
                _ => {
                    keys.toggle(column, true);
                }
            }

            let unique: HashSet<_> = keys.iter().map(|k| k.column_id.as_str()).collect();
            assert_eq!(unique.len(), keys.len(), "duplicate key after step {}", step);
        }
    }

    #[test]
    fn test_serde_enforces_uniqueness() {
        let keys: SortKeySequence = serde_json::from_str(
            r#"[{"column_id":"a","direction":"desc"},{"column_id":"a","direction":"asc"}]"#,
        )
        .unwrap();
        assert_eq!(keys, seq(&[SortKey::desc("a")]));
        assert_eq!(
            serde_json::to_string(&keys).unwrap(),
            r#"[{"column_id":"a","direction":"desc"}]"#
        );
    }

    #[test]
    fn test_display() {
        let keys = seq(&[SortKey::desc("age"), SortKey::asc("name")]);
        assert_eq!(keys.to_string(), "age:desc, name:asc");
    }
}
