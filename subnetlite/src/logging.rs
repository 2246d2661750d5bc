//! Process-wide tracing setup.

use std::path::PathBuf;
use std::sync::OnceLock;
use subnetlite_shared::{SubnetliteError, SubnetliteResult};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_FILE_NAME: &str = "subnetlite.log";

// Flushes the file writer on drop, so it lives as long as the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Filter directives used when `RUST_LOG` is not set, e.g. `info` or
    /// `subnetlite=debug`.
    pub level: String,
    /// Also write to a daily-rolling file in this directory.
    pub log_dir: Option<PathBuf>,
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            ansi: true,
        }
    }
}

/// Install the global subscriber.
///
/// Fails with `Internal` if a global subscriber is already set.
pub fn init_logging(options: &LoggingOptions) -> SubnetliteResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&options.level))
        .map_err(|e| {
            SubnetliteError::Config(format!("invalid log filter '{}': {}", options.level, e))
        })?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(options.ansi)
        .with_target(false);

    let (file_layer, guard) = match &options.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SubnetliteError::Internal(format!("failed to install logger: {}", e)))?;

    if let Some(guard) = guard {
        let _ = FILE_GUARD.set(guard);
    }

    tracing::debug!(log_dir = ?options.log_dir, "Logging initialized");
    Ok(())
}
