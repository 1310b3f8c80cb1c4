//! Logging Infrastructure
//!
//! `RUST_LOG` drives the filter; without it the service logs its own
//! crate, HTTP access lines and security events at info.

use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "tearoom_server=info,http_access=info,security=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logger on stdout
pub fn init_logger() {
    init_logger_with_file(None);
}

/// Initialize the logger, writing daily-rolling files under `log_dir` when given
pub fn init_logger_with_file(log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "tearoom-server");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("Cannot create log directory {dir}, logging to stdout");
    }

    subscriber.init();
}
