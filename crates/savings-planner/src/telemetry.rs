use crate::config::TelemetryConfig;
use std::env;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log filter '{directives}' is not a valid EnvFilter directive")]
    InvalidFilter {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Origin of the filter the subscriber ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    RustLog,
    Configured,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub source: FilterSource,
    pub directives: String,
}

/// Prefers a parseable, non-empty `RUST_LOG`; otherwise the configured level must parse.
fn resolve_filter(
    rust_log: Option<String>,
    config: &TelemetryConfig,
) -> Result<(EnvFilter, ActiveFilter), TelemetryError> {
    if let Some(directives) = rust_log.filter(|value| !value.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            let active = ActiveFilter {
                source: FilterSource::RustLog,
                directives,
            };
            return Ok((filter, active));
        }
    }

    let filter =
        EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
            directives: config.log_level.clone(),
            source,
        })?;
    let active = ActiveFilter {
        source: FilterSource::Configured,
        directives: config.log_level.clone(),
    };
    Ok((filter, active))
}

/// Installs the global compact fmt subscriber and reports which filter it uses.
pub fn init(config: &TelemetryConfig) -> Result<ActiveFilter, TelemetryError> {
    let (filter, active) = resolve_filter(env::var("RUST_LOG").ok(), config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)?;

    Ok(active)
}
