//! Output rendering for sorted forests

use comfy_table::{Table, presets::UTF8_FULL};
use indexmap::IndexSet;
use rowsort_core::{Cell, Row, RowIterator};
use rowsort_sorting::SortKeySequence;
use serde::Serialize;

use crate::input::RowRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented table
    #[default]
    Table,
    /// JSON document with the key sequence and the row records
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    sort_keys: &'a SortKeySequence,
    rows: Vec<RowRecord>,
}

pub fn render(
    format: OutputFormat,
    keys: &SortKeySequence,
    rows: &[Row],
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(keys, rows)),
        OutputFormat::Json => render_json(keys, rows),
    }
}

pub fn render_json(keys: &SortKeySequence, rows: &[Row]) -> anyhow::Result<String> {
    let output = JsonOutput {
        sort_keys: keys,
        rows: rows.iter().map(RowRecord::from_row).collect(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// One table row per forest row, in depth-first order, ids indented by depth
pub fn render_table(keys: &SortKeySequence, rows: &[Row]) -> String {
    let columns = column_ids(rows);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(
        std::iter::once("id".to_string()).chain(columns.iter().map(|c| header(keys, c))),
    );

    for (depth, row) in with_depth(rows) {
        let mut cells = Vec::with_capacity(columns.len() + 1);
        cells.push(format!("{}{}", "  ".repeat(depth), row.id));
        cells.extend(columns.iter().map(|column_id| match row.cell(column_id) {
            Some(Cell::Data { value }) if !value.is_null() => value.to_string(),
            Some(Cell::Display { label: Some(label) }) => label.clone(),
            _ => String::new(),
        }));
        table.add_row(cells);
    }

    table.to_string()
}

/// Column header with its sort indicator, e.g. `age ▼2`
fn header(keys: &SortKeySequence, column_id: &str) -> String {
    let Some(direction) = keys.current_direction(column_id) else {
        return column_id.to_string();
    };
    let arrow = match direction {
        rowsort_core::SortDirection::Asc => "▲",
        rowsort_core::SortDirection::Desc => "▼",
    };
    match keys.position(column_id) {
        Some(ix) if keys.len() > 1 => format!("{} {}{}", column_id, arrow, ix + 1),
        _ => format!("{} {}", column_id, arrow),
    }
}

/// Every column id in the forest, in first-seen order
fn column_ids(rows: &[Row]) -> IndexSet<String> {
    RowIterator::new(rows)
        .flat_map(|row| row.cells().keys().cloned())
        .collect()
}

fn with_depth(rows: &[Row]) -> Vec<(usize, &Row)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &Row)> = rows.iter().rev().map(|row| (0, row)).collect();
    while let Some((depth, row)) = stack.pop() {
        out.push((depth, row));
        if let Some(children) = row.sub_rows() {
            stack.extend(children.iter().rev().map(|child| (depth + 1, child)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowsort_core::{SortKey, Value};

    fn forest() -> Vec<Row> {
        vec![
            Row::from_values("p", [("name", Value::from("Parent")), ("age", Value::from(50))])
                .with_cell("menu", Cell::display(Some("edit".to_string())))
                .with_sub_rows(vec![Row::from_values("c", [("name", "Child")])]),
        ]
    }

    #[test]
    fn test_table_indents_children() {
        let table = render_table(&SortKeySequence::new(), &forest());

        assert!(table.contains("│ p "));
        assert!(table.contains("│   c "));
        assert!(table.contains("edit"));
        assert!(table.contains("Child"));
    }

    #[test]
    fn test_headers_show_sort_state() {
        let single = SortKeySequence::from_keys([SortKey::desc("age")]);
        assert_eq!(header(&single, "age"), "age ▼");
        assert_eq!(header(&single, "name"), "name");

        let multi = SortKeySequence::from_keys([SortKey::desc("age"), SortKey::asc("name")]);
        assert_eq!(header(&multi, "name"), "name ▲2");
    }

    #[test]
    fn test_column_ids_first_seen_order() {
        let columns: Vec<String> = column_ids(&forest()).into_iter().collect();
        assert_eq!(columns, vec!["name", "age", "menu"]);
    }

    #[test]
    fn test_json_output() {
        let keys = SortKeySequence::from_keys([SortKey::asc("name")]);
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&keys, &forest()).unwrap()).unwrap();

        assert_eq!(
            json["sort_keys"],
            serde_json::json!([{ "column_id": "name", "direction": "asc" }])
        );
        assert_eq!(json["rows"][0]["display"], serde_json::json!(["menu"]));
        assert_eq!(json["rows"][0]["sub_rows"][0]["id"], "c");
    }
}
