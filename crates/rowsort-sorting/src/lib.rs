//! rowsort sorting - multi-key sorting for hierarchical rows
//!
//! This crate provides:
//! - `SortKeySequence` - the active sort keys and their toggle/clear state machine
//! - `HierarchicalSorter` - stable multi-key sorting applied to every level of a row forest
//! - `ColumnSortOptions` - per-column comparison customization (invert, projections, comparators)
//! - `SortController` - owns rows, keys and listeners, and recomputes on every change

pub mod compare;
pub mod controller;
pub mod interaction;
pub mod key_sequence;
pub mod options;
pub mod sorter;

pub use compare::compare_values;
pub use controller::{ColumnSortState, SortController, SortListener, SortSnapshot, SubscriptionId};
pub use interaction::{
    HeaderEvent, Modifiers, MultiSortPredicate, default_multi_sort_predicate, modifier_predicate,
};
pub use key_sequence::SortKeySequence;
pub use options::{ColumnOptionsMap, ColumnSortOptions, CompareFn, SortValueFn};
pub use sorter::{HierarchicalSorter, sort_rows};
