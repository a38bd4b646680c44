// Fetch interactor - Download a source video, then cut clips from it

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::app::cut_interactor::{CutInteractor, CutRequest};
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Request for the full download and cut pipeline
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    /// Existing directory that receives the per-run staging directory
    pub download_root: PathBuf,
    pub category: String,
    pub clip_length: ClipLength,
    pub clips: u32,
    pub layout: OutputLayout,
    pub seed: Option<u64>,
}

/// Interactor for the fetch use case
pub struct FetchInteractor {
    fetch_port: Arc<dyn FetchPort>,
    cut_interactor: Arc<CutInteractor>,
    log_port: Arc<dyn LogPort>,
    progress_port: Arc<dyn ProgressPort>,
}

impl FetchInteractor {
    /// Create new fetch interactor with injected ports
    pub fn new(
        fetch_port: Arc<dyn FetchPort>,
        cut_interactor: Arc<CutInteractor>,
        log_port: Arc<dyn LogPort>,
        progress_port: Arc<dyn ProgressPort>,
    ) -> Self {
        Self {
            fetch_port,
            cut_interactor,
            log_port,
            progress_port,
        }
    }

    /// Execute the fetch use case.
    ///
    /// The source is downloaded into a fresh `yt_<unix time>_<random>`
    /// directory under `download_root`, which is removed once the run ends
    /// whether it succeeded or not.
    pub async fn execute(&self, request: FetchRequest) -> Result<CutReport, DomainError> {
        let staging = tempfile::Builder::new()
            .prefix(&format!("yt_{}_", Utc::now().timestamp()))
            .tempdir_in(&request.download_root)
            .map_err(|e| {
                DomainError::FsError(format!(
                    "Failed to create download directory in {}: {}",
                    request.download_root.display(),
                    e
                ))
            })?;
        self.log_port
            .debug(&format!("Staging download in {}", staging.path().display()))
            .await;

        let result = self.download_and_cut(&request, staging.path().to_path_buf()).await;

        let staging_path = staging.path().to_path_buf();
        if let Err(e) = staging.close() {
            self.log_port
                .warn(&format!(
                    "Failed to remove download directory {}: {}",
                    staging_path.display(),
                    e
                ))
                .await;
        }
        result
    }

    async fn download_and_cut(
        &self,
        request: &FetchRequest,
        staging: PathBuf,
    ) -> Result<CutReport, DomainError> {
        self.progress_port
            .step("Downloading video from YouTube...")
            .await;
        let source = self.fetch_port.fetch(&request.url, &staging).await?;
        self.log_port
            .info(&format!("Saved source to {}", source.display()))
            .await;

        self.cut_interactor
            .execute(CutRequest {
                source,
                category: request.category.clone(),
                clip_length: request.clip_length,
                clips: request.clips,
                layout: request.layout.clone(),
                seed: request.seed,
            })
            .await
    }
}
