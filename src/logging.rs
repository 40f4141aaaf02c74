//! Logging setup and the observability hook handed to library components.
//!
//! The binary calls [`init_with_config`] once. Library code does not log
//! through a global; loaders and the watcher take an `Arc<dyn Reporter>`
//! and report through it. [`TracingReporter`] forwards to `tracing`,
//! [`RecordingReporter`] keeps messages in memory.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! default = "info"
//!
//! [logging.modules]
//! dujour = "debug"
//! ```
//!
//! `RUST_LOG` takes precedence over config:
//! ```bash
//! RUST_LOG=debug dujour serve
//! ```

use std::sync::Once;

use parking_lot::Mutex;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Initialize logging with configuration.
///
/// Safe to call multiple times; only the first call takes effect.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(config.filter_directive())
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Log an event with component context.
///
/// # Examples
/// ```ignore
/// log_event!("watcher", "reloaded", "{}", path.display());
/// log_event!("http", "stopped");
/// ```
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Debug-only event logging.
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Observability collaborator passed to each component.
pub trait Reporter: Send + Sync {
    fn debug(&self, component: &str, message: &str);
    fn info(&self, component: &str, message: &str);
    fn warn(&self, component: &str, message: &str);
    fn error(&self, component: &str, message: &str);
}

/// Forwards reports to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn debug(&self, component: &str, message: &str) {
        tracing::debug!("[{component}] {message}");
    }

    fn info(&self, component: &str, message: &str) {
        tracing::info!("[{component}] {message}");
    }

    fn warn(&self, component: &str, message: &str) {
        tracing::warn!("[{component}] {message}");
    }

    fn error(&self, component: &str, message: &str) {
        tracing::error!("[{component}] {message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Keeps every report in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    entries: Mutex<Vec<(ReportLevel, String)>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports as `(level, "[component] message")`.
    pub fn entries(&self) -> Vec<(ReportLevel, String)> {
        self.entries.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.at(ReportLevel::Info)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.at(ReportLevel::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(ReportLevel::Error)
    }

    fn at(&self, level: ReportLevel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    fn push(&self, level: ReportLevel, component: &str, message: &str) {
        self.entries
            .lock()
            .push((level, format!("[{component}] {message}")));
    }
}

impl Reporter for RecordingReporter {
    fn debug(&self, component: &str, message: &str) {
        self.push(ReportLevel::Debug, component, message);
    }

    fn info(&self, component: &str, message: &str) {
        self.push(ReportLevel::Info, component, message);
    }

    fn warn(&self, component: &str, message: &str) {
        self.push(ReportLevel::Warn, component, message);
    }

    fn error(&self, component: &str, message: &str) {
        self.push(ReportLevel::Error, component, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_keeps_levels_apart() {
        let reporter = RecordingReporter::new();
        reporter.debug("watcher", "event a");
        reporter.info("loader", "loaded a");
        reporter.warn("loader", "skipped b");
        reporter.error("watcher", "broken c");

        assert_eq!(reporter.infos(), vec!["[loader] loaded a"]);
        assert_eq!(reporter.warnings(), vec!["[loader] skipped b"]);
        assert_eq!(reporter.errors(), vec!["[watcher] broken c"]);
        assert_eq!(reporter.entries().len(), 4);
        assert_eq!(reporter.entries()[0].0, ReportLevel::Debug);
    }
}
