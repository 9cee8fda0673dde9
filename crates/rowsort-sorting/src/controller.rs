//! Sort state owner
//!
//! `SortController` holds the unsorted forest, the active key sequence and
//! the column options. Every change to rows or keys recomputes the sorted
//! forest and hands a snapshot to each registered listener.

use std::sync::Arc;

use rowsort_core::{Result, Row, SortConfig, SortDirection};

use crate::interaction::{HeaderEvent, MultiSortPredicate, modifier_predicate};
use crate::key_sequence::SortKeySequence;
use crate::options::{ColumnOptionsMap, ColumnSortOptions};
use crate::sorter::HierarchicalSorter;

/// Callback invoked with the current sort result
pub type SortListener = Box<dyn Fn(&SortSnapshot<'_>) + Send + Sync>;

/// Borrowed view of the controller's published state
#[derive(Debug, Clone, Copy)]
pub struct SortSnapshot<'a> {
    pub keys: &'a SortKeySequence,
    pub rows: &'a [Row],
}

/// Handle returned by [`SortController::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a column header needs to render its sort indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSortState {
    /// Current direction, if the column is sorted
    pub order: Option<SortDirection>,
    /// Index in the key sequence (0 = primary)
    pub priority: Option<usize>,
    /// Toggling and clearing are ignored for this column
    pub disabled: bool,
}

pub struct SortController {
    config: SortConfig,
    sorter: HierarchicalSorter,
    column_options: ColumnOptionsMap,
    is_multi_sort_event: MultiSortPredicate,
    sort_keys: SortKeySequence,
    pre_sorted_rows: Arc<[Row]>,
    // Shares storage with `pre_sorted_rows` in server-side mode
    sorted_rows: Arc<[Row]>,
    listeners: Vec<(SubscriptionId, SortListener)>,
    next_subscription: u64,
}

impl SortController {
    pub fn new(config: SortConfig) -> Self {
        Self {
            sorter: HierarchicalSorter::from_config(&config),
            column_options: ColumnSortOptions::map_from_config(&config),
            is_multi_sort_event: modifier_predicate(config.multi_sort_modifier),
            sort_keys: SortKeySequence::from_keys(config.initial_sort_keys.iter().cloned()),
            pre_sorted_rows: Arc::from(Vec::new()),
            sorted_rows: Arc::from(Vec::new()),
            listeners: Vec::new(),
            next_subscription: 0,
            config,
        }
    }

    /// Add code-supplied column options; they replace config-derived ones
    pub fn with_column_options(mut self, options: ColumnOptionsMap) -> Self {
        self.column_options.extend(options);
        self.recompute();
        self
    }

    /// Replace the modifier-key test used to detect multi-sort clicks
    pub fn with_multi_sort_predicate(
        mut self,
        predicate: impl Fn(&HeaderEvent) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_multi_sort_event = Arc::new(predicate);
        self
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn sorter(&self) -> &HierarchicalSorter {
        &self.sorter
    }

    /// Replace the unsorted forest
    ///
    /// Fails without changing anything if the forest exceeds `max_depth`.
    pub fn set_rows(&mut self, rows: Vec<Row>) -> Result<()> {
        self.sorter.check_depth(&rows)?;
        self.pre_sorted_rows = rows.into();
        self.recompute();
        Ok(())
    }

    /// Apply a header activation to a column
    ///
    /// Returns false, and changes nothing, when the column is disabled.
    pub fn toggle(&mut self, column_id: &str, event: &HeaderEvent) -> bool {
        if self.is_disabled(column_id) {
            tracing::warn!(column_id, "Ignoring toggle on disabled column");
            return false;
        }

        let multi_sort = self.is_multi_sort_event(event);
        self.sort_keys
            .toggle_with_order(column_id, multi_sort, &self.config.toggle_order);
        self.recompute();
        true
    }

    /// Remove a column from the sort; returns whether anything changed
    pub fn clear(&mut self, column_id: &str) -> bool {
        if self.is_disabled(column_id) {
            tracing::warn!(column_id, "Ignoring clear on disabled column");
            return false;
        }
        if !self.sort_keys.clear(column_id) {
            return false;
        }
        self.recompute();
        true
    }

    /// Replace the key sequence wholesale
    pub fn set_sort_keys(&mut self, keys: impl Into<SortKeySequence>) {
        self.sort_keys = keys.into();
        self.recompute();
    }

    pub fn sort_keys(&self) -> &SortKeySequence {
        &self.sort_keys
    }

    pub fn sorted_rows(&self) -> &[Row] {
        &self.sorted_rows
    }

    pub fn pre_sorted_rows(&self) -> &[Row] {
        &self.pre_sorted_rows
    }

    pub fn column_state(&self, column_id: &str) -> ColumnSortState {
        ColumnSortState {
            order: self.sort_keys.current_direction(column_id),
            priority: self.sort_keys.position(column_id),
            disabled: self.is_disabled(column_id),
        }
    }

    /// Whether `event` extends the sort rather than replacing it
    pub fn is_multi_sort_event(&self, event: &HeaderEvent) -> bool {
        !self.config.disable_multi_sort && (self.is_multi_sort_event)(event)
    }

    /// Register a listener; it is called once right away with the current state
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&SortSnapshot<'_>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        listener(&self.snapshot());
        self.listeners.push((id, Box::new(listener)));
        tracing::debug!(subscription = id.0, listeners = self.listeners.len(), "Subscribed");
        id
    }

    /// Drop a listener; returns whether it was registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn snapshot(&self) -> SortSnapshot<'_> {
        SortSnapshot {
            keys: &self.sort_keys,
            rows: &self.sorted_rows,
        }
    }

    fn is_disabled(&self, column_id: &str) -> bool {
        self.column_options
            .get(column_id)
            .is_some_and(|options| options.disable)
    }

    fn recompute(&mut self) {
        self.sorted_rows = if self.config.server_side {
            Arc::clone(&self.pre_sorted_rows)
        } else {
            self.sorter
                .sort(&self.pre_sorted_rows, &self.sort_keys, &self.column_options)
                .into()
        };

        tracing::debug!(
            keys = %self.sort_keys,
            rows = self.sorted_rows.len(),
            server_side = self.config.server_side,
            listeners = self.listeners.len(),
            "Recomputed sorted rows"
        );

        let snapshot = self.snapshot();
        for (_, listener) in &self.listeners {
            listener(&snapshot);
        }
    }
}

impl std::fmt::Debug for SortController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortController")
            .field("sort_keys", &self.sort_keys)
            .field("column_options", &self.column_options)
            .field("rows", &self.pre_sorted_rows.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
