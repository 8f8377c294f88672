// Tracing subscriber setup

use statuscache_error::{ConfigError, ConfigResult};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Registry,
};

use crate::config::TracingConfig;

/// Initializes the global tracing subscriber.
///
/// # Arguments
///
/// * `log_level`: optional filter directive, defaults to "info". Module-specific
///                directives such as "statuscache_resource=debug,info" are accepted.
///                `RUST_LOG` takes precedence when set.
/// * `json_output`: emit JSON lines instead of human-readable output.
pub fn init_tracing(log_level: Option<&str>, json_output: Option<bool>) -> ConfigResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))
        .map_err(|e| ConfigError::Tracing(e.to_string()))?;

    let subscriber = Registry::default().with(env_filter);

    if json_output.unwrap_or(false) {
        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true);
        ::tracing::subscriber::set_global_default(subscriber.with(json_layer))
            .map_err(|e| ConfigError::Tracing(e.to_string()))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_level(true);
        ::tracing::subscriber::set_global_default(subscriber.with(fmt_layer))
            .map_err(|e| ConfigError::Tracing(e.to_string()))?;
    }

    Ok(())
}

/// Initializes tracing from a loaded configuration section.
pub fn init_from_config(config: &TracingConfig) -> ConfigResult<()> {
    init_tracing(Some(&config.log_level), Some(config.json_output))
}
