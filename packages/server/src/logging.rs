use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub const LOG_FILE_PREFIX: &str = "skilltrace.log";

/// Keeps the file writer flushing until dropped at shutdown
pub struct LogGuard {
    file: Option<WorkerGuard>,
}

impl LogGuard {
    pub fn writes_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Install the global subscriber: stdout always, a daily-rolling file when `config.file_logs`
pub fn init_tracing(config: &Config) -> LogGuard {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match config.file_logs.then(|| file_writer(&config.log_dir)) {
        Some(Some((writer, guard))) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    LogGuard { file: guard }
}

/// Non-blocking writer into `log_dir`; `None` if the directory cannot be created
pub fn file_writer(log_dir: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    if let Err(err) = std::fs::create_dir_all(log_dir) {
        // subscriber is not installed yet
        eprintln!("file logging disabled, cannot create {}: {err}", log_dir.display());
        return None;
    }
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    Some(tracing_appender::non_blocking(appender))
}
