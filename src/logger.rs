use std::result::Result;

use snafu::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{registry, EnvFilter};

use crate::config::Config;
use crate::error::{ApplicationError, CreateLogFileSnafu, InitializeLoggerSnafu};

/// Install the global subscriber. The returned guard flushes the log file and must outlive the server.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>, ApplicationError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let (file_layer, guard) = match &config.log_dir {
        Some(log_dir) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("videos-api")
                .filename_suffix("log")
                .build(log_dir)
                .context(CreateLogFileSnafu)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = layer().with_ansi(false).json().with_writer(non_blocking);

            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = layer().pretty().with_writer(std::io::stdout);

    let subscriber = registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).context(InitializeLoggerSnafu)?;

    Ok(guard)
}
