//! Structured logging and tracing for infiniplot.
//!
//! Provides span-based, filterable logging via the `tracing` ecosystem.
//! Console output carries uptime timestamps and module paths; an optional
//! JSON file layer records the same events for post-mortem analysis of
//! streaming behaviour. The configured level can be overridden with `RUST_LOG`.

use std::path::Path;

use infiniplot_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither the config nor `RUST_LOG` says otherwise.
pub const DEFAULT_FILTER: &str = "info";

/// Build the filter string from the config's log level.
///
/// An empty level falls back to [`DEFAULT_FILTER`].
pub fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// Sets up:
/// - console output with uptime, module path and level
/// - a JSON file layer writing `infiniplot.log` into `log_dir` when the config
///   enables file logging
/// - environment-based filtering (`RUST_LOG` wins over the config)
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber installed.
///
/// ```no_run
/// use infiniplot_config::Config;
/// use infiniplot_log::init_logging;
///
/// init_logging(None, Some(&Config::default()));
/// ```
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) {
    let filter_str = filter_string(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let wants_file = config.is_some_and(|c| c.debug.log_to_file);
    if wants_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("infiniplot.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        let _ = subscriber.with(file_layer).try_init();
        return;
    }

    let _ = subscriber.try_init();
}
