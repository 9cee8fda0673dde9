//! End-to-end sorting scenarios
//!
//! Drives `SortController` from TOML configuration and JSON row data, the
//! way an embedding table would.

mod common;

use indoc::indoc;
use pretty_assertions::assert_eq;
use rowsort_core::{Row, SortConfig, SortDirection, SortKey};
use rowsort_sorting::{
    ColumnOptionsMap, ColumnSortOptions, HeaderEvent, SortController, SortKeySequence, sort_rows,
};

use common::{child_ids, ids, org_chart, outline};

#[test]
fn header_clicks_sort_every_level() {
    let mut controller = SortController::new(SortConfig::default());
    controller.set_rows(org_chart()).unwrap();

    controller.toggle("name", &HeaderEvent::click());

    let rows = controller.sorted_rows();
    assert_eq!(ids(rows), vec!["eng", "ops", "hr"]);
    assert_eq!(child_ids(rows, "eng"), vec!["eng-infra", "eng-web"]);
    assert_eq!(child_ids(rows[0].sub_rows().unwrap(), "eng-web"), vec!["mia", "zoe", "adam"]);
    assert_eq!(child_ids(rows, "ops"), vec!["ben", "kim"]);
}

#[test]
fn secondary_key_breaks_ties() {
    let mut controller = SortController::new(SortConfig::default());
    controller.set_rows(org_chart()).unwrap();

    controller.toggle("size", &HeaderEvent::click());
    controller.toggle("size", &HeaderEvent::click());
    controller.toggle("name", &HeaderEvent::shift_click());

    assert_eq!(
        controller.sort_keys().keys(),
        &[SortKey::desc("size"), SortKey::asc("name")]
    );
    // ops and hr share a size, so name decides
    assert_eq!(ids(controller.sorted_rows()), vec!["eng", "ops", "hr"]);

    controller.toggle("name", &HeaderEvent::shift_click());
    assert_eq!(ids(controller.sorted_rows()), vec!["eng", "hr", "ops"]);
}

#[test]
fn configured_columns_apply() {
    let config = SortConfig::from_toml_str(indoc! {r#"
        initial_sort_keys = [
            { column_id = "age", direction = "desc" },
            { column_id = "name" },
        ]
        string_collation = "case_insensitive"

        [columns.age]
        invert = true

        [columns.actions]
        disable = true
    "#})
    .unwrap();

    let mut controller = SortController::new(config);
    controller.set_rows(org_chart()).unwrap();

    let web = child_ids(controller.sorted_rows()[0].sub_rows().unwrap(), "eng-web");
    assert_eq!(web, vec!["mia", "zoe", "adam"]);
    assert!(!controller.toggle("actions", &HeaderEvent::click()));
    assert_eq!(controller.column_state("age").order, Some(SortDirection::Desc));
}

#[test]
fn display_only_column_leaves_order_alone() {
    let forest = org_chart();

    let sorted = sort_rows(
        &forest,
        &SortKeySequence::from_keys([SortKey::desc("actions")]),
        &ColumnOptionsMap::new(),
    );

    assert_eq!(outline(&sorted), outline(&forest));
}

#[test]
fn rows_loaded_from_json_sort_like_built_rows() {
    let forest: Vec<Row> = serde_json::from_str(indoc! {r#"
        [
            { "id": "b", "cells": { "n": { "kind": "data", "value": 2 } } },
            {
                "id": "a",
                "cells": { "n": { "kind": "data", "value": 1 } },
                "sub_rows": [
                    { "id": "a2", "cells": { "n": { "kind": "data", "value": [1, 2] } } },
                    { "id": "a1", "cells": { "n": { "kind": "data", "value": [1] } } }
                ]
            }
        ]
    "#})
    .unwrap();

    let sorted = sort_rows(
        &forest,
        &SortKeySequence::from_keys([SortKey::asc("n")]),
        &ColumnOptionsMap::new(),
    );

    assert_eq!(
        outline(&sorted),
        vec![
            (0, "a".to_string()),
            (1, "a1".to_string()),
            (1, "a2".to_string()),
            (0, "b".to_string()),
        ]
    );
}

#[test]
fn sorting_preserves_every_row() {
    let forest = org_chart();
    let mut options = ColumnOptionsMap::new();
    options.insert(
        "name".to_string(),
        ColumnSortOptions::new().with_compare_fn(|a, b| {
            let len = |v: &rowsort_core::Value| v.as_str().map(str::len).unwrap_or(0);
            len(a).cmp(&len(b))
        }),
    );

    let sorted = sort_rows(
        &forest,
        &SortKeySequence::from_keys([SortKey::desc("name"), SortKey::asc("age")]),
        &options,
    );

    let mut before: Vec<_> = outline(&forest);
    let mut after: Vec<_> = outline(&sorted);
    before.sort();
    after.sort();
    assert_eq!(before, after);
    assert_eq!(ids(&sorted), vec!["eng", "ops", "hr"]);
}
