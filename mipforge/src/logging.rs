//! Logging bootstrap for the library and CLI.
//!
//! Output goes to stderr by default so packed pixel data can be piped
//! to stdout; an optional non-blocking file layer can be added for
//! longer batch runs. Verbosity is controlled through the `RUST_LOG`
//! environment variable and defaults to `info`.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the log file writer alive; dropping it flushes and closes the
/// file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize logging to stderr only.
pub fn init() -> Result<LoggingGuard, io::Error> {
    init_inner(None)
}

/// Initialize logging to stderr plus a log file in `log_dir`.
pub fn init_with_file(log_dir: &Path, log_file: &str) -> Result<LoggingGuard, io::Error> {
    std::fs::create_dir_all(log_dir)?;
    init_inner(Some((log_dir, log_file)))
}

fn init_inner(file: Option<(&Path, &str)>) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    let (file_layer, file_guard) = match file {
        Some((dir, name)) => {
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
