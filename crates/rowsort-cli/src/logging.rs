//! Logging setup for the rowsort binary
//!
//! Console output goes to stderr so that stdout carries only the sorted
//! rows. When a log directory is given, a daily-rolling JSON file layer is
//! added as well. `RUST_LOG` takes precedence over the configured filter.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE_NAME: &str = "rowsort.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for JSON log files; no file logging when absent
    pub log_dir: Option<PathBuf>,

    /// Whether to include file/line information in console logs
    pub include_location: bool,

    /// Whether to log span open/close (sort timing)
    pub enable_spans: bool,

    /// Default log level filter
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            include_location: cfg!(debug_assertions),
            enable_spans: false,
            default_filter: "warn".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Configuration for a `--log-level` value such as `debug`
    ///
    /// Bare levels apply to the rowsort crates only, so dependency noise stays
    /// at `warn`. Anything else is treated as a full filter directive.
    pub fn for_level(level: &str) -> Self {
        let lowered = level.trim().to_ascii_lowercase();
        let default_filter = if is_bare_level(&lowered) {
            format!(
                "warn,rowsort={level},rowsort_core={level},rowsort_sorting={level}",
                level = lowered
            )
        } else {
            level.to_string()
        };

        Self {
            enable_spans: matches!(lowered.as_str(), "debug" | "trace"),
            default_filter,
            ..Self::default()
        }
    }

    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }
}

fn is_bare_level(level: &str) -> bool {
    matches!(level, "off" | "error" | "warn" | "info" | "debug" | "trace")
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer on drop and must be held until
/// the program exits.
pub fn init(config: LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))?;

    let span_events = if config.enable_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let mut layers = Vec::new();

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(span_events.clone())
        .with_writer(std::io::stderr)
        .compact()
        .with_filter(env_filter.clone())
        .boxed();
    layers.push(console_layer);

    let mut guard = None;
    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let json_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(non_blocking)
            .with_filter(env_filter)
            .boxed();
        layers.push(json_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = ?config.log_dir,
        filter = %config.default_filter,
        "Logging initialized"
    );

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_quiet() {
        let config = LoggingConfig::default();
        assert_eq!(config.default_filter, "warn");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_bare_level_scopes_to_rowsort_crates() {
        let config = LoggingConfig::for_level("debug");
        assert_eq!(
            config.default_filter,
            "warn,rowsort=debug,rowsort_core=debug,rowsort_sorting=debug"
        );
        assert!(config.enable_spans);
    }

    #[test]
    fn test_level_is_case_insensitive() {
        let config = LoggingConfig::for_level("DEBUG");
        assert_eq!(
            config.default_filter,
            "warn,rowsort=debug,rowsort_core=debug,rowsort_sorting=debug"
        );
        assert!(config.enable_spans);

        let config = LoggingConfig::for_level("Trace");
        assert!(config.enable_spans);
        assert!(!LoggingConfig::for_level("INFO").enable_spans);
    }

    #[test]
    fn test_directive_passes_through() {
        let config = LoggingConfig::for_level("rowsort_sorting=trace");
        assert_eq!(config.default_filter, "rowsort_sorting=trace");
        assert!(!config.enable_spans);
    }

    #[test]
    fn test_with_log_dir() {
        let config = LoggingConfig::for_level("info").with_log_dir(Some(PathBuf::from("logs")));
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }
}
