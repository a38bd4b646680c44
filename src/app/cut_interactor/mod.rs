// Cut interactor - Probe, sample and encode clips from a local source

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::EncodeOrchestrator;
use crate::ports::*;

/// Request for cutting clips out of a local video
#[derive(Debug, Clone)]
pub struct CutRequest {
    pub source: PathBuf,
    pub category: String,
    pub clip_length: ClipLength,
    pub clips: u32,
    pub layout: OutputLayout,
    /// Fixed sampling seed; random when absent
    pub seed: Option<u64>,
}

/// Interactor for the cut use case
pub struct CutInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    progress_port: Arc<dyn ProgressPort>,
    orchestrator: EncodeOrchestrator,
}

impl CutInteractor {
    /// Create new cut interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        encode_port: Arc<dyn EncodePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        progress_port: Arc<dyn ProgressPort>,
    ) -> Self {
        let orchestrator = EncodeOrchestrator::new(encode_port, Arc::clone(&log_port));
        Self {
            probe_port,
            fs_port,
            log_port,
            progress_port,
            orchestrator,
        }
    }

    /// Execute the cut use case
    pub async fn execute(&self, request: CutRequest) -> Result<CutReport, DomainError> {
        let output_dir = request
            .layout
            .clip_dir(&request.category, request.clip_length)?;

        self.progress_port
            .step(&format!(
                "Cutting {} x {}s clips...",
                request.clips, request.clip_length
            ))
            .await;

        let duration = self.probe_port.probe_duration(&request.source).await?;
        let source = SourceVideo::new(&request.source, duration);
        self.log_port
            .info(&format!(
                "Source {} is {:.3}s long",
                source.path.display(),
                source.duration
            ))
            .await;

        let existing = self.fs_port.count_clips(&output_dir).await?;
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let requests = SegmentSampler::sample(
            source.duration,
            request.clip_length,
            request.clips,
            existing,
            &mut rng,
        )?;

        if requests.len() < request.clips as usize {
            self.log_port
                .warn(&format!(
                    "Requested {} clips but the source only allows {}",
                    request.clips,
                    requests.len()
                ))
                .await;
        }
        self.log_port
            .debug(&format!("Sampled clip windows: {:?}", requests))
            .await;

        self.fs_port.create_directory(&output_dir).await?;
        let files = self
            .orchestrator
            .run(&requests, &source.path, &output_dir)
            .await?;

        Ok(CutReport::new(files))
    }
}
