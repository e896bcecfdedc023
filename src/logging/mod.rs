//! Unified logging system
//!
//! Two layers:
//! - `tracing` for internal diagnostics (stderr, filtered by verbosity)
//! - `LogEntry` values streamed over an optional channel so a front end can
//!   show protocol traffic and connection events

pub mod entry;

pub use entry::{Direction, LogEntry, LogKind};

use tokio::sync::mpsc;
use tracing::trace;

/// Initialize internal tracing for debug output
///
/// Call early in main() before any logging occurs.
/// Set `verbose` to true for debug-level output.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}

/// Send a log entry without blocking
///
/// Drops the entry if there is no log channel or it is full; `what` names
/// the dropped entry in trace output.
pub fn try_log(log_tx: &Option<mpsc::Sender<LogEntry>>, entry: LogEntry, what: &str) {
    if let Some(tx) = log_tx {
        if tx.try_send(entry).is_err() {
            trace!("Log entry dropped: {}", what);
        }
    }
}
