// Tracing log adapter - Structured logging using tracing crate

use crate::domain::errors::*;
use crate::ports::*;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// Tracing log adapter
///
/// The subscriber itself is installed by the binary (see `logging`); this
/// adapter only forwards messages.
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        info!("{}", message);
    }

    async fn warn(&self, message: &str) {
        warn!("{}", message);
    }

    async fn error(&self, message: &str) {
        error!("{}", message);
    }

    async fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}
