//! Logging Infrastructure
//!
//! `tracing` subscriber setup: console output by default, daily rolling
//! files when a log directory exists.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info` on stderr
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with an optional file output
///
/// `log_level` accepts anything `EnvFilter` does ("debug",
/// "mercato_core=trace,info"). `RUST_LOG` wins when set.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "mercato");
            let _ = subscriber
                .with_ansi(false)
                .with_writer(file_appender)
                .try_init();
            return;
        }
    }

    // The CLI writes its output to stdout, logs go to stderr
    let _ = subscriber.with_writer(std::io::stderr).try_init();
}
