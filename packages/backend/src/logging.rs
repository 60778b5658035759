use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the non-blocking file writer alive for the process lifetime.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

fn file_logging_enabled() -> bool {
    std::env::var("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn file_layer() -> Option<(RollingFileAppender, String)> {
    if !file_logging_enabled() {
        return None;
    }
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
    match std::fs::create_dir_all(&log_dir) {
        Ok(()) => Some((
            RollingFileAppender::new(Rotation::DAILY, &log_dir, "glossa.log"),
            log_dir,
        )),
        Err(err) => {
            eprintln!("failed to create log directory {log_dir}: {err}");
            None
        }
    }
}

/// Initializes tracing with an env-filtered stdout layer and, when
/// `ENABLE_FILE_LOGS` is set, a daily-rolling file layer under `LOG_DIR`.
pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_layer() {
        Some((appender, log_dir)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(true))
                .init();
            tracing::info!(%log_dir, "file logging enabled");
            Some(FileLogGuard { _guard: guard })
        }
        None => {
            registry.init();
            None
        }
    }
}
