//! bgclip library
//!
//! Downloads a source video, trims 10 seconds from each end and cuts randomly
//! positioned fixed-length clips, encoding through VAAPI with a sticky
//! fallback to libx264.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod output;
pub mod ports;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    ClipLength, ClipRequest, CutReport, EncodeJob, EncoderMode, OutputLayout, SourceVideo,
    TrimWindow,
};
pub use domain::rules::SegmentSampler;
pub use engine::{EncodeOrchestrator, ModeLatch};
