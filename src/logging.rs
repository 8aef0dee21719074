/// Structured logging for the home-info service.
///
/// Sets up `tracing` output to the console and, for daemon runs, to a log
/// file. Also classifies fetch failures so that a silent sensor does not
/// drown the log while a broken service still shows up as an error.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::FetchError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides `min_level`. When `log_file` is given, entries are
/// also appended there without ANSI colors; keep the returned guard alive
/// for as long as the process logs, dropping it flushes the file.
/// Calling this twice leaves the first subscriber in place.
pub fn init_logging(min_level: LogLevel, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(min_level.as_directive()));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().unwrap_or_else(|| OsStr::new("webinfo.log"));
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("logging already initialized");
    }

    guard
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// The endpoint stayed silent; sensors drop out routinely.
    Expected,
    /// The endpoint answered wrongly or is missing from the configuration.
    Unexpected,
    /// Cannot tell from here (host down, network hiccup).
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

pub fn classify_fetch_failure(err: &FetchError) -> FailureType {
    match err {
        FetchError::Timeout => FailureType::Expected,
        FetchError::Status(_) | FetchError::Decode(_) | FetchError::Unconfigured(_) => {
            FailureType::Unexpected
        }
        FetchError::Connection(_) | FetchError::Transport(_) => FailureType::Unknown,
    }
}

/// Logs a fetch failure at the level its classification calls for.
pub fn log_fetch_failure(endpoint: &str, err: &FetchError) {
    let failure = classify_fetch_failure(err);
    match failure {
        FailureType::Expected => tracing::debug!(endpoint, %failure, error = %err, "fetch failed"),
        FailureType::Unexpected => tracing::error!(endpoint, %failure, error = %err, "fetch failed"),
        FailureType::Unknown => tracing::warn!(endpoint, %failure, error = %err, "fetch failed"),
    }
}

/// One line summarizing an endpoint check run.
pub fn log_verification_summary(total: usize, working: usize, failed: usize) {
    if failed == 0 {
        tracing::info!(total, working, failed, "endpoint verification complete");
    } else if working == 0 {
        tracing::error!(total, working, failed, "endpoint verification complete");
    } else {
        tracing::warn!(total, working, failed, "endpoint verification complete");
    }
}
