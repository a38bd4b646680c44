//! Tracing subscriber setup
//!
//! Diagnostics go to stderr; stdout is reserved for progress lines.

use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;

/// Level used when no setting and no `RUST_LOG` provide one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Build the filter: an explicit level wins over `RUST_LOG`
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter, DomainError> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| DomainError::ConfigError(format!("Invalid log level {:?}: {}", level, e))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))),
    }
}

/// Install the global subscriber. Subsequent calls are no-ops.
pub fn init_logging(level: Option<&str>, json: bool) -> Result<(), DomainError> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // Already installed (e.g. in tests) is fine.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    Ok(())
}
