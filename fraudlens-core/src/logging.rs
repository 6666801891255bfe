//! Logging for fraudlens
//!
//! Logs go to `~/.local/state/fraudlens/fraudlens.log.<date>`, rotated daily.
//! The terminal belongs to the TUI, so nothing is ever logged to stdout.
//!
//! The configured level applies to the fraudlens crates only. HTTP plumbing
//! (`reqwest`, `hyper`) is held at `warn` so that a debug session logs gateway
//! calls rather than connection pool chatter. `RUST_LOG` replaces all of this.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Crates whose events follow the configured level
const OWN_TARGETS: &[&str] = &["fraudlens_core", "fraudlens"];

/// Level for everything else
const DEPENDENCY_LEVEL: &str = "warn";

/// Directive string for `level`, e.g. `warn,fraudlens_core=debug,fraudlens=debug`.
pub fn directives(level: &str) -> String {
    let mut out = DEPENDENCY_LEVEL.to_string();
    for target in OWN_TARGETS {
        out.push_str(&format!(",{target}={level}"));
    }
    out
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directives(&config.level))
        .map_err(|e| Error::Config(format!("invalid log level '{}': {}", config.level, e)))
}

fn file_appender(dir: &Path, config: &LoggingConfig) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("fraudlens.log")
        .max_log_files(config.max_files.max(1))
        .build(dir)
        .map_err(|e| Error::Config(format!("failed to create log appender: {}", e)))
}

/// Initialize file logging in the XDG state directory.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    let filter = build_filter(config)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender(&log_dir, config)?);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        level = %config.level,
        keep = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Keeps the background log writer running.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Base path of the log file; rotated files carry a date suffix.
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
