//! Encoding engine: ffmpeg argument construction and the per-run encode
//! orchestrator with accelerated to software fallback.

pub mod command;
pub mod orchestrator;

use std::path::PathBuf;

pub use command::FfmpegCommand;
pub use orchestrator::{EncodeOrchestrator, ModeLatch};

/// Default VAAPI render node
pub const DEFAULT_VAAPI_DEVICE: &str = "/dev/dri/renderD128";

/// Default constant quality (`-qp` for VAAPI, `-crf` for libx264)
pub const DEFAULT_QUALITY: u8 = 18;

/// Encoder tuning shared by both encoder paths
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderSettings {
    /// VAAPI render node used for decode, scale and encode
    pub vaapi_device: PathBuf,
    /// Constant quality target (0-51, lower is higher quality)
    pub quality: u8,
    /// Thread count for the software encoder
    pub software_threads: usize,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            vaapi_device: PathBuf::from(DEFAULT_VAAPI_DEVICE),
            quality: DEFAULT_QUALITY,
            software_threads: num_cpus::get(),
        }
    }
}

impl EncoderSettings {
    /// Set the VAAPI render node
    pub fn with_vaapi_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.vaapi_device = device.into();
        self
    }

    /// Set the quality target, clamped to the valid range
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(51);
        self
    }
}
