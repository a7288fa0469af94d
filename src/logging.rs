use crate::{LOG_DIRECTORY, settings::{Settings, config_dir}};
use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Send logs to a daily rolling file under the config directory.
///
/// The terminal is owned by the presenter, so nothing is written to stdout.
/// `RUST_LOG` wins over the configured `log_level`. Keep the returned guard
/// alive for as long as logs should be flushed.
pub fn init(settings: &Settings) -> Result<WorkerGuard> {
    let log_dir = config_dir()?.join(LOG_DIRECTORY);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "allmusic.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true),
        )
        .try_init()?;

    Ok(guard)
}
