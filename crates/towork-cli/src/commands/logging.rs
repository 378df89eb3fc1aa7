use anyhow::Result;
use towork_infrastructure::ToworkPaths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const DEFAULT_FILTER: &str = "warn";
const FILE_FILTER: &str = "info,hyper=warn,reqwest=warn";
const LOG_FILE: &str = "towork-cli.log";

/// Installs the stderr and daily file loggers.
///
/// # Arguments
///
/// * `filter` - Explicit stderr filter; RUST_LOG, then `warn` otherwise
///
/// # Returns
///
/// The guard flushing the file writer; keep it alive until exit. `None`
/// when no log directory is available.
pub fn init(filter: Option<&str>) -> Result<Option<WorkerGuard>> {
    let stderr_filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    let (file, guard) = match ToworkPaths::logs_dir() {
        Ok(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry().with(stderr).with(file).try_init()?;
    Ok(guard)
}
