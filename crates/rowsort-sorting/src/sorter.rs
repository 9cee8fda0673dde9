//! Hierarchical multi-key sorter
//!
//! Sorting a forest happens in three passes, none of which recurse:
//!
//! 1. The forest is flattened into an arena of borrowed rows. Every node
//!    records the arena indices of its children, which are always greater
//!    than its own index.
//! 2. Each level (the roots, then every node's children) is reordered as a
//!    permutation of arena indices. Sort values are computed once per row and
//!    key before the level is sorted. Rows with no signal for a key hold their
//!    position among the rows they tie with on earlier keys.
//! 3. Fresh rows are assembled from the highest index down, so children are
//!    finished before the parent that takes ownership of them.

mod merge;

use std::borrow::Cow;
use std::cmp::Ordering;

use rowsort_core::{
    Cell, Result, Row, RowsortError, SortConfig, SortDirection, StringCollation, Value,
};

use crate::compare::compare_comparable;
use crate::key_sequence::SortKeySequence;
use crate::options::{ColumnOptionsMap, CompareFn, SortValueFn};

/// Sort a forest with the default sorter
pub fn sort_rows(
    rows: &[Row],
    keys: &SortKeySequence,
    options: &ColumnOptionsMap,
) -> Vec<Row> {
    HierarchicalSorter::default().sort(rows, keys, options)
}

/// Stateless engine that sorts every level of a row forest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchicalSorter {
    collation: StringCollation,
    max_depth: Option<usize>,
}

impl HierarchicalSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorter matching a configuration's collation and depth limit
    pub fn from_config(config: &SortConfig) -> Self {
        Self {
            collation: config.string_collation,
            max_depth: config.max_depth,
        }
    }

    pub fn with_collation(mut self, collation: StringCollation) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn collation(&self) -> StringCollation {
        self.collation
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Sort `rows` and, recursively, every row's sub-rows
    ///
    /// The depth limit is not enforced here; see [`Self::try_sort`].
    pub fn sort(
        &self,
        rows: &[Row],
        keys: &SortKeySequence,
        options: &ColumnOptionsMap,
    ) -> Vec<Row> {
        let arena = Arena::build(rows);
        self.sort_arena(arena, keys, options)
    }

    /// Like [`Self::sort`], but fails if the forest is deeper than the limit
    pub fn try_sort(
        &self,
        rows: &[Row],
        keys: &SortKeySequence,
        options: &ColumnOptionsMap,
    ) -> Result<Vec<Row>> {
        let arena = Arena::build(rows);
        self.check_arena_depth(&arena)?;
        Ok(self.sort_arena(arena, keys, options))
    }

    /// Check a forest against the depth limit without sorting it
    pub fn check_depth(&self, rows: &[Row]) -> Result<()> {
        self.check_arena_depth(&Arena::build(rows))
    }

    fn check_arena_depth(&self, arena: &Arena<'_>) -> Result<()> {
        match self.max_depth {
            Some(max_depth) if arena.depth > max_depth => {
                tracing::warn!(depth = arena.depth, max_depth, "Row forest too deep to sort");
                Err(RowsortError::DepthLimitExceeded {
                    max_depth,
                    depth: arena.depth,
                })
            }
            _ => Ok(()),
        }
    }

    #[tracing::instrument(
        name = "sort_rows",
        level = "debug",
        skip_all,
        fields(roots = arena.roots.len(), nodes = arena.nodes.len(), keys = keys.len())
    )]
    fn sort_arena(
        &self,
        mut arena: Arena<'_>,
        keys: &SortKeySequence,
        options: &ColumnOptionsMap,
    ) -> Vec<Row> {
        let plans: Vec<KeyPlan<'_>> = keys
            .iter()
            .map(|key| {
                let column = options.get(&key.column_id);
                KeyPlan {
                    column_id: &key.column_id,
                    direction: key.direction,
                    invert: column.is_some_and(|c| c.invert),
                    get_sort_value: column.and_then(|c| c.get_sort_value.as_ref()),
                    compare_fn: column.and_then(|c| c.compare_fn.as_ref()),
                }
            })
            .collect();

        if !plans.is_empty() {
            let mut roots = std::mem::take(&mut arena.roots);
            self.sort_level(&mut roots, &arena.nodes, &plans);
            arena.roots = roots;

            for ix in 0..arena.nodes.len() {
                if let Some(mut children) = arena.nodes[ix].children.take() {
                    self.sort_level(&mut children, &arena.nodes, &plans);
                    arena.nodes[ix].children = Some(children);
                }
            }
        }

        let sorted = arena.assemble();
        tracing::debug!(roots = sorted.len(), "Sorted row forest");
        sorted
    }

    /// Reorder one level of arena indices in place
    ///
    /// Keys apply one at a time to groups of rows that tie on every earlier
    /// key. Within a group, rows with no signal for the current key keep
    /// their slots, and the remaining rows are stably sorted into the slots
    /// they leave free. Each run of equal rows, and the rows without signal,
    /// then form the groups for the next key.
    fn sort_level(&self, level: &mut Vec<usize>, nodes: &[Node<'_>], plans: &[KeyPlan<'_>]) {
        if level.len() < 2 {
            return;
        }

        let decorated: Vec<Vec<SortInput<'_>>> = level
            .iter()
            .map(|&ix| plans.iter().map(|plan| plan.input_for(nodes[ix].row)).collect())
            .collect();

        // order[slot] is the position in `level` of the row now in that slot
        let mut order: Vec<usize> = (0..level.len()).collect();
        let mut groups: Vec<(Vec<usize>, usize)> = vec![(order.clone(), 0)];

        while let Some((slots, key)) = groups.pop() {
            if slots.len() < 2 || key == plans.len() {
                continue;
            }

            let (signal_slots, quiet_slots): (Vec<usize>, Vec<usize>) = slots
                .into_iter()
                .partition(|&slot| decorated[order[slot]][key].value().is_some());

            let mut rows: Vec<usize> = signal_slots.iter().map(|&slot| order[slot]).collect();
            merge::stable_sort_by(&mut rows, |a, b| {
                self.compare_key(&decorated[a][key], &decorated[b][key], &plans[key])
            });
            for (&slot, &row) in signal_slots.iter().zip(&rows) {
                order[slot] = row;
            }

            let mut run_start = 0;
            for end in 1..=rows.len() {
                let run_ends = end == rows.len()
                    || self.compare_key(
                        &decorated[rows[end - 1]][key],
                        &decorated[rows[end]][key],
                        &plans[key],
                    ) != Ordering::Equal;
                if run_ends {
                    if end - run_start > 1 {
                        groups.push((signal_slots[run_start..end].to_vec(), key + 1));
                    }
                    run_start = end;
                }
            }
            groups.push((quiet_slots, key + 1));
        }

        tracing::trace!(rows = level.len(), "Sorted level");
        let reordered: Vec<usize> = order.iter().map(|&pos| level[pos]).collect();
        *level = reordered;
    }

    fn compare_key(&self, a: &SortInput<'_>, b: &SortInput<'_>, plan: &KeyPlan<'_>) -> Ordering {
        let (Some(a), Some(b)) = (a.value(), b.value()) else {
            return Ordering::Equal;
        };
        let ordering = match plan.compare_fn {
            Some(compare) => compare(a, b),
            None => compare_comparable(a, b, self.collation),
        };
        plan.orient(ordering)
    }
}

/// A sort key resolved against its column options
struct KeyPlan<'a> {
    column_id: &'a str,
    direction: SortDirection,
    invert: bool,
    get_sort_value: Option<&'a SortValueFn>,
    compare_fn: Option<&'a CompareFn>,
}

impl KeyPlan<'_> {
    /// The value a row contributes for this key
    fn input_for<'r>(&self, row: &'r Row) -> SortInput<'r> {
        let value = match row.cell(self.column_id) {
            Some(Cell::Data { value }) => value,
            Some(Cell::Display { .. }) | None => return SortInput::NoSignal,
        };

        if self.compare_fn.is_some() {
            return SortInput::Value(Cow::Borrowed(value));
        }
        match self.get_sort_value {
            Some(project) => {
                let projected = project(value);
                if projected.is_comparable() {
                    SortInput::Value(Cow::Owned(projected))
                } else {
                    SortInput::NoSignal
                }
            }
            None if value.is_comparable() => SortInput::Value(Cow::Borrowed(value)),
            None => SortInput::NoSignal,
        }
    }

    fn orient(&self, ordering: Ordering) -> Ordering {
        let ordering = self.direction.apply(ordering);
        if self.invert { ordering.reverse() } else { ordering }
    }
}

/// A row's contribution to one key, computed once per level
enum SortInput<'a> {
    /// Display cell, missing cell, or unsupported value
    NoSignal,
    Value(Cow<'a, Value>),
}

impl SortInput<'_> {
    fn value(&self) -> Option<&Value> {
        match self {
            SortInput::NoSignal => None,
            SortInput::Value(value) => Some(value.as_ref()),
        }
    }
}

struct Node<'a> {
    row: &'a Row,
    children: Option<Vec<usize>>,
}

/// Flattened, borrowed view of a forest
struct Arena<'a> {
    nodes: Vec<Node<'a>>,
    roots: Vec<usize>,
    depth: usize,
}

impl<'a> Arena<'a> {
    fn build(forest: &'a [Row]) -> Self {
        let mut nodes = Vec::new();
        let roots = Self::push_level(&mut nodes, forest);
        let mut depth = 0;

        let mut stack: Vec<(usize, usize)> = roots.iter().map(|&ix| (ix, 1)).collect();
        while let Some((ix, level)) = stack.pop() {
            depth = depth.max(level);
            let row = nodes[ix].row;
            if let Some(sub_rows) = row.sub_rows() {
                let children = Self::push_level(&mut nodes, sub_rows);
                stack.extend(children.iter().map(|&child| (child, level + 1)));
                nodes[ix].children = Some(children);
            }
        }

        Self {
            nodes,
            roots,
            depth,
        }
    }

    fn push_level(nodes: &mut Vec<Node<'a>>, rows: &'a [Row]) -> Vec<usize> {
        rows.iter()
            .map(|row| {
                nodes.push(Node {
                    row,
                    children: None,
                });
                nodes.len() - 1
            })
            .collect()
    }

    /// Build owned rows bottom-up, following each level's current order
    fn assemble(self) -> Vec<Row> {
        let mut built: Vec<Option<Row>> = Vec::with_capacity(self.nodes.len());
        built.resize_with(self.nodes.len(), || None);

        for (ix, node) in self.nodes.iter().enumerate().rev() {
            let sub_rows = node
                .children
                .as_ref()
                .map(|children| children.iter().filter_map(|&c| built[c].take()).collect());
            built[ix] = Some(node.row.with_replaced_sub_rows(sub_rows));
        }

        self.roots
            .iter()
            .filter_map(|&ix| built[ix].take())
            .collect()
    }
}
