//! File logging. The terminal belongs to the TUI, so nothing goes to stdout.

use anyhow::Context;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "vibefi.log";
const DEFAULT_FILTER: &str = "vibefi=info";

/// Install the global subscriber writing to `<data_dir>/vibefi.log`.
///
/// The returned guard flushes the writer on drop; hold it until exit.
pub fn init(data_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("create dir {}", data_dir.display()))?;

    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("install tracing subscriber")?;

    tracing::info!(dir = %data_dir.display(), "logging initialized");
    Ok(guard)
}
