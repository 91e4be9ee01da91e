//! Logging setup

use tracing_subscriber::EnvFilter;

use netclock_core::{NetclockError, NetclockResult};

use crate::config::{LogConfig, LogFormat};

/// Install the global tracing subscriber
///
/// Logs go to stderr so page output on stdout stays clean.
pub fn init(config: &LogConfig) -> NetclockResult<()> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok(), config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| NetclockError::InvalidConfig(format!("logging: {e}")))
}

/// `RUST_LOG` wins over `log.filter`; either one must parse
fn build_filter(env: Option<String>, config: &LogConfig) -> NetclockResult<EnvFilter> {
    match env.filter(|directives| !directives.trim().is_empty()) {
        Some(directives) => EnvFilter::try_new(&directives).map_err(|e| {
            NetclockError::InvalidConfig(format!(
                "{} {directives:?}: {e}",
                EnvFilter::DEFAULT_ENV
            ))
        }),
        None => EnvFilter::try_new(&config.filter).map_err(|e| {
            NetclockError::InvalidConfig(format!("log.filter {:?}: {e}", config.filter))
        }),
    }
}
