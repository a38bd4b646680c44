// Domain errors - Error types for the domain layer

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types
///
/// Every variant is terminal for a run; the only recovery path in the
/// pipeline is the accelerated to software encoder fallback, which never
/// surfaces an error unless the software retry fails too.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Source video missing, unreadable, or with an unparseable duration
    #[error("Failed to probe {path}: {message}")]
    ProbeError { path: PathBuf, message: String },

    /// Clip duration outside the allowed set or a bad clip count
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Usable window shorter than one clip
    #[error("Video too short after trimming. Usable: {usable:.1}s, need at least {needed}s")]
    InsufficientDuration { usable: f64, needed: u32 },

    /// Both encoders failed for a clip, or the software-only attempt failed
    #[error("Encoding {output} failed: {message}")]
    EncodeError { output: PathBuf, message: String },

    /// Source acquisition failed
    #[error("Download failed: {0}")]
    FetchError(String),

    /// Output tree could not be prepared or scanned
    #[error("File system error: {0}")]
    FsError(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Create a probe error for a path
    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProbeError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an encode error for an output path
    pub fn encode(output: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::EncodeError {
            output: output.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsError(err.to_string())
    }
}
