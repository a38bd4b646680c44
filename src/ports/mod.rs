// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use crate::domain::errors::*;
use crate::domain::model::*;
use async_trait::async_trait;

/// Port for media duration probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total duration of a local video file in seconds
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError>;
}

/// Port for clip encoding
#[async_trait]
pub trait EncodePort: Send + Sync {
    /// Check whether the hardware encoder can be used on this machine
    async fn accelerator_available(&self) -> bool;

    /// Encode one clip window with the given encoder path.
    ///
    /// Implementations must either leave a complete file at `job.output` or
    /// no file at all.
    async fn encode(&self, job: &EncodeJob, mode: EncoderMode) -> Result<(), DomainError>;
}

/// Port for source video acquisition
#[async_trait]
pub trait FetchPort: Send + Sync {
    /// Download `url` into `dest_dir` and return the local video file
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Count finalized clips (`bg_<digits>.mp4`) directly inside a directory
    async fn count_clips(&self, dir_path: &Path) -> Result<u32, DomainError>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);
}

/// Port for caller-facing phase reporting
#[async_trait]
pub trait ProgressPort: Send + Sync {
    /// Announce the start of a phase
    async fn step(&self, step: &str);
}
