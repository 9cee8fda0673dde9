//! Shared fixtures for sorting integration tests

#![allow(dead_code)]

use rowsort_core::{Cell, Row, Value};

/// A small org chart: departments with nested teams and people
pub fn org_chart() -> Vec<Row> {
    vec![
        department("eng", "Engineering", 40).with_sub_rows(vec![
            team("eng-web", "Web", 12).with_sub_rows(vec![
                person("zoe", "Zoe", 31),
                person("adam", "adam", 44),
                person("mia", "Mia", 31),
            ]),
            team("eng-infra", "Infra", 9).with_sub_rows(vec![
                person("omar", "Omar", 29),
                person("li", "Li", 52),
            ]),
        ]),
        department("ops", "Operations", 15).with_sub_rows(vec![
            person("kim", "Kim", 38),
            person("ben", "Ben", 38),
        ]),
        department("hr", "People", 15),
    ]
}

pub fn department(id: &str, name: &str, headcount: i64) -> Row {
    Row::from_values(id, [("name", Value::from(name)), ("size", Value::from(headcount))])
        .with_cell("actions", Cell::display(Some("...".to_string())))
}

pub fn team(id: &str, name: &str, headcount: i64) -> Row {
    Row::from_values(id, [("name", Value::from(name)), ("size", Value::from(headcount))])
}

pub fn person(id: &str, name: &str, age: i64) -> Row {
    Row::from_values(id, [("name", Value::from(name)), ("age", Value::from(age))])
}

/// Ids of one level
pub fn ids(rows: &[Row]) -> Vec<&str> {
    rows.iter().map(|row| row.id.as_str()).collect()
}

/// Ids of a row's children, empty for leaves
pub fn child_ids<'a>(rows: &'a [Row], id: &str) -> Vec<&'a str> {
    rows.iter()
        .find(|row| row.id == id)
        .and_then(Row::sub_rows)
        .map(ids)
        .unwrap_or_default()
}

/// Depth-first ids with their depth
pub fn outline(rows: &[Row]) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &Row)> = rows.iter().rev().map(|row| (0, row)).collect();
    while let Some((depth, row)) = stack.pop() {
        out.push((depth, row.id.clone()));
        if let Some(children) = row.sub_rows() {
            stack.extend(children.iter().rev().map(|child| (depth + 1, child)));
        }
    }
    out
}
