//! rowsort command line
//!
//! Reads a JSON row forest, applies a sort configuration plus any keys or
//! simulated header clicks given on the command line, and prints the sorted
//! forest as a table or as JSON.

mod input;
mod logging;
mod render;

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use rowsort_core::{SortConfig, SortKey};
use rowsort_sorting::{HeaderEvent, Modifiers, SortController};

use crate::logging::LoggingConfig;
use crate::render::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rowsort", version)]
#[command(about = "Sort hierarchical row data by one or more columns")]
struct Cli {
    /// JSON array of row records; `-` or absent reads stdin
    #[arg(long, value_name = "FILE")]
    rows: Option<PathBuf>,

    /// TOML sort configuration
    #[arg(short, long, value_name = "FILE", env = "ROWSORT_CONFIG")]
    config: Option<PathBuf>,

    /// Replace the sort keys, highest priority first (e.g. `age:desc`)
    #[arg(long = "sort", value_name = "COLUMN[:DIR]")]
    sort_keys: Vec<SortKey>,

    /// Click a column header; a leading `+` holds the multi-sort modifier
    #[arg(long = "toggle", value_name = "[+]COLUMN")]
    toggles: Vec<ToggleArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level or filter directive for stderr logging
    #[arg(long, default_value = "warn", env = "ROWSORT_LOG")]
    log_level: String,

    /// Also write JSON logs to this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

/// A simulated header click
#[derive(Debug, Clone, PartialEq, Eq)]
struct ToggleArg {
    column_id: String,
    multi_sort: bool,
}

impl FromStr for ToggleArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (multi_sort, column_id) = match s.strip_prefix('+') {
            Some(rest) => (true, rest.trim()),
            None => (false, s.trim()),
        };
        if column_id.is_empty() {
            return Err(format!("'{}' does not name a column", s));
        }
        Ok(Self {
            column_id: column_id.to_string(),
            multi_sort,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log_guard =
        logging::init(LoggingConfig::for_level(&cli.log_level).with_log_dir(cli.log_dir.clone()))?;

    let output = run(&cli)?;
    println!("{}", output);
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = match &cli.config {
        Some(path) => SortConfig::load(path)
            .with_context(|| format!("Failed to load sort configuration {}", path.display()))?,
        None => SortConfig::default(),
    };
    let rows = input::read_rows(cli.rows.as_deref())?;

    let controller = sort(config, rows, &cli.sort_keys, &cli.toggles)?;
    render::render(cli.format, controller.sort_keys(), controller.sorted_rows())
}

fn sort(
    config: SortConfig,
    rows: Vec<rowsort_core::Row>,
    sort_keys: &[SortKey],
    toggles: &[ToggleArg],
) -> anyhow::Result<SortController> {
    let mut controller = SortController::new(config);
    controller
        .set_rows(rows)
        .context("Row data exceeds the configured max_depth")?;

    if !sort_keys.is_empty() {
        controller.set_sort_keys(sort_keys.to_vec());
    }

    let multi_sort_click =
        HeaderEvent::with_modifiers(Modifiers::only(controller.config().multi_sort_modifier));
    for toggle in toggles {
        let event = if toggle.multi_sort {
            multi_sort_click
        } else {
            HeaderEvent::click()
        };
        if !controller.toggle(&toggle.column_id, &event) {
            tracing::warn!(column_id = %toggle.column_id, "Column is not sortable");
        }
    }

    tracing::info!(
        keys = %controller.sort_keys(),
        roots = controller.sorted_rows().len(),
        "Sorted rows"
    );
    Ok(controller)
}
