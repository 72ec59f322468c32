//! Logging initialisation.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Filter directive for a `-v` count, falling back to the configured level.
fn directive(config: &LoggingConfig, verbose: u8) -> &str {
    match verbose {
        0 => config.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `-v`, which wins over `logging.level`. The
/// subscriber also captures records emitted through the `log` facade.
///
/// # Errors
/// Returns an error if the directive is invalid or a subscriber is already set.
pub fn init_logging(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive(config, verbose))
            .with_context(|| format!("invalid log level '{}'", directive(config, verbose)))?,
    };

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
    }
    .context("failed to install tracing subscriber")
}
