use std::sync::Arc;

use crate::adapters::{
    FFmpegAdapter, FFprobeAdapter, FsLocalAdapter, TracingLogAdapter, YtDlpAdapter,
};
use crate::app::{cut_interactor::CutInteractor, fetch_interactor::FetchInteractor};
use crate::domain::errors::DomainError;
use crate::engine::EncoderSettings;
use crate::ports::{EncodePort, FetchPort, FsPort, LogPort, ProbePort, ProgressPort};

pub trait AppContainer: Send + Sync {
    fn cut_interactor(&self) -> Arc<CutInteractor>;
    fn fetch_interactor(&self) -> Result<Arc<FetchInteractor>, DomainError>;
}

pub struct DefaultAppContainer {
    cut_interactor: Arc<CutInteractor>,
    log_port: Arc<dyn LogPort>,
    progress_port: Arc<dyn ProgressPort>,
}

impl DefaultAppContainer {
    pub fn new(
        encoder_settings: EncoderSettings,
        progress_port: Arc<dyn ProgressPort>,
    ) -> Result<Self, DomainError> {
        let probe_port = Arc::new(FFprobeAdapter::new()?);
        let encode_port = Arc::new(FFmpegAdapter::new(encoder_settings)?);
        let fs_port = Arc::new(FsLocalAdapter::new()?);
        let log_port: Arc<dyn LogPort> = Arc::new(TracingLogAdapter::new()?);

        let cut_interactor = Arc::new(CutInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            encode_port as Arc<dyn EncodePort>,
            fs_port as Arc<dyn FsPort>,
            Arc::clone(&log_port),
            Arc::clone(&progress_port),
        ));

        Ok(Self {
            cut_interactor,
            log_port,
            progress_port,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn cut_interactor(&self) -> Arc<CutInteractor> {
        Arc::clone(&self.cut_interactor)
    }

    /// yt-dlp is only resolved when a download is actually requested
    fn fetch_interactor(&self) -> Result<Arc<FetchInteractor>, DomainError> {
        let fetch_port = Arc::new(YtDlpAdapter::new()?);
        Ok(Arc::new(FetchInteractor::new(
            fetch_port as Arc<dyn FetchPort>,
            Arc::clone(&self.cut_interactor),
            Arc::clone(&self.log_port),
            Arc::clone(&self.progress_port),
        )))
    }
}
