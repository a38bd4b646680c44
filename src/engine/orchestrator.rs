//! Sequential clip encoding with a one-way accelerated to software fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::model::{ClipRequest, EncodeJob, EncoderMode};
use crate::ports::{EncodePort, LogPort};

/// Encoder mode for one orchestrator run.
///
/// Starts accelerated only when the hardware encoder was detected and, once
/// degraded, stays on software for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeLatch {
    mode: EncoderMode,
}

impl ModeLatch {
    pub fn new(accelerator_available: bool) -> Self {
        let mode = if accelerator_available {
            EncoderMode::Accelerated
        } else {
            EncoderMode::Software
        };
        Self { mode }
    }

    pub fn mode(&self) -> EncoderMode {
        self.mode
    }

    /// Switch to software. Returns whether the mode changed.
    pub fn degrade(&mut self) -> bool {
        let changed = self.mode == EncoderMode::Accelerated;
        self.mode = EncoderMode::Software;
        changed
    }
}

/// Drives clip encoding through an [`EncodePort`].
pub struct EncodeOrchestrator {
    encoder: Arc<dyn EncodePort>,
    log_port: Arc<dyn LogPort>,
}

impl EncodeOrchestrator {
    pub fn new(encoder: Arc<dyn EncodePort>, log_port: Arc<dyn LogPort>) -> Self {
        Self { encoder, log_port }
    }

    /// Encode every request in order into `output_dir`.
    ///
    /// Any clip that cannot be encoded aborts the run; files finalized before
    /// it stay on disk but no partial list is returned.
    pub async fn run(
        &self,
        requests: &[ClipRequest],
        source: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let mut latch = ModeLatch::new(self.encoder.accelerator_available().await);
        self.log_port
            .info(&format!("Using {} encoder for clip encoding", latch.mode()))
            .await;

        let mut outputs = Vec::with_capacity(requests.len());
        for request in requests {
            let job = EncodeJob::for_request(source, request, output_dir);
            self.encode_clip(&job, &mut latch).await?;
            self.log_port
                .info(&format!(
                    "Finalized {} ({:.3}s..{:.3}s, {})",
                    job.output.display(),
                    request.start,
                    request.end(),
                    latch.mode()
                ))
                .await;
            outputs.push(job.output);
        }

        Ok(outputs)
    }

    async fn encode_clip(
        &self,
        job: &EncodeJob,
        latch: &mut ModeLatch,
    ) -> Result<(), DomainError> {
        match self.encoder.encode(job, latch.mode()).await {
            Ok(()) => Ok(()),
            Err(err) if latch.mode() == EncoderMode::Accelerated => {
                latch.degrade();
                self.log_port
                    .warn(&format!(
                        "Accelerated encode of {} failed ({}); \
                         switching to software encoding for the rest of the run",
                        job.output.display(),
                        err
                    ))
                    .await;
                self.encoder
                    .encode(job, latch.mode())
                    .await
                    .map_err(|retry_err| self.fatal(job, retry_err))
            }
            Err(err) => Err(self.fatal(job, err)),
        }
    }

    fn fatal(&self, job: &EncodeJob, err: DomainError) -> DomainError {
        match err {
            DomainError::EncodeError { .. } => err,
            other => DomainError::encode(&job.output, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_starts_accelerated_when_available() {
        assert_eq!(ModeLatch::new(true).mode(), EncoderMode::Accelerated);
        assert_eq!(ModeLatch::new(false).mode(), EncoderMode::Software);
    }

    #[test]
    fn test_latch_degrades_once() {
        let mut latch = ModeLatch::new(true);
        assert!(latch.degrade());
        assert_eq!(latch.mode(), EncoderMode::Software);
        assert!(!latch.degrade());
        assert_eq!(latch.mode(), EncoderMode::Software);
    }
}
