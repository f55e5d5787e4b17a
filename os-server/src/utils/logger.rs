//! Logging Infrastructure
//!
//! tracing-subscriber setup. Level comes from `RUST_LOG` when set,
//! falling back to the given default; file output is daily-rolling.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with the default level and no file output
pub fn init_logger() {
    init_logger_with_file("info", None);
}

/// Initialize the logger
///
/// `default_level` applies when `RUST_LOG` is unset. When `log_dir`
/// points at an existing directory, output additionally goes to a
/// daily-rolling `os-server.*` file there.
pub fn init_logger_with_file(default_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir
        && Path::new(dir).is_dir()
    {
        let file_appender = tracing_appender::rolling::daily(dir, "os-server");
        subscriber.with_writer(file_appender).init();
        return;
    }

    subscriber.init();
}
