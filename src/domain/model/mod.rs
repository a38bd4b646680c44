// Domain models - Core types and data structures

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::DomainError;

/// Seconds discarded from each end of the source video
pub const TRIM_SECONDS: f64 = 10.0;

/// Grid spacing of candidate clip starts
pub const CANDIDATE_STEP_SECONDS: f64 = 1.0;

/// Output clip file name prefix
pub const CLIP_FILE_PREFIX: &str = "bg_";

/// Output clip file extension
pub const CLIP_FILE_EXTENSION: &str = "mp4";

/// Allowed clip lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClipLength {
    Thirty,
    Sixty,
}

impl ClipLength {
    /// Clip length in whole seconds
    pub fn seconds(self) -> u32 {
        match self {
            ClipLength::Thirty => 30,
            ClipLength::Sixty => 60,
        }
    }

    /// Clip length as fractional seconds
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.seconds())
    }
}

impl TryFrom<u32> for ClipLength {
    type Error = DomainError;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        match seconds {
            30 => Ok(ClipLength::Thirty),
            60 => Ok(ClipLength::Sixty),
            other => Err(DomainError::InvalidDuration(format!(
                "clip duration must be 30 or 60 seconds, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ClipLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds())
    }
}

/// Local source file together with its probed duration
#[derive(Debug, Clone, PartialEq)]
pub struct SourceVideo {
    pub path: PathBuf,
    pub duration: f64,
}

impl SourceVideo {
    pub fn new(path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }
}

/// Usable time range left after trimming both ends of the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    pub start: f64,
    pub end: f64,
}

impl TrimWindow {
    /// Derive the window for a source of `total` seconds.
    ///
    /// The end is clamped so the window always spans at least one clip; the
    /// sampler is responsible for rejecting sources that are really too short.
    pub fn new(total: f64, clip: ClipLength) -> Self {
        let start = TRIM_SECONDS;
        let end = (total - TRIM_SECONDS).max(start + clip.as_secs_f64());
        Self { start, end }
    }

    /// Length of the window in seconds
    pub fn usable(&self) -> f64 {
        self.end - self.start
    }

    /// How many clips would fit back to back
    pub fn capacity(&self, clip: ClipLength) -> usize {
        (self.usable() / clip.as_secs_f64()).floor() as usize
    }

    /// All grid-aligned starts from which a whole clip fits in the window
    pub fn candidate_starts(&self, clip: ClipLength) -> Vec<f64> {
        let duration = clip.as_secs_f64();
        let mut starts = Vec::new();
        let mut t = self.start;
        while t + duration <= self.end {
            starts.push(t);
            t += CANDIDATE_STEP_SECONDS;
        }
        starts
    }
}

/// One clip to cut: its output ordinal and source window
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRequest {
    /// 1-based output ordinal
    pub index: u32,
    pub start: f64,
    pub duration: ClipLength,
}

impl ClipRequest {
    pub fn new(index: u32, start: f64, duration: ClipLength) -> Self {
        Self {
            index,
            start,
            duration,
        }
    }

    /// End of the source window
    pub fn end(&self) -> f64 {
        self.start + self.duration.as_secs_f64()
    }

    /// Final file name, e.g. `bg_007.mp4`
    pub fn file_name(&self) -> String {
        clip_file_name(self.index)
    }
}

/// File name for an output ordinal
pub fn clip_file_name(index: u32) -> String {
    format!("{}{:03}.{}", CLIP_FILE_PREFIX, index, CLIP_FILE_EXTENSION)
}

/// Whether `name` looks like a finalized clip (`bg_<digits>.mp4`)
pub fn is_clip_file_name(name: &str) -> bool {
    name.strip_prefix(CLIP_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(CLIP_FILE_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .map(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}

/// Encoder path used for a clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EncoderMode {
    /// Hardware encoder (VAAPI)
    Accelerated,
    /// CPU encoder
    Software,
}

impl fmt::Display for EncoderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderMode::Accelerated => write!(f, "accelerated"),
            EncoderMode::Software => write!(f, "software"),
        }
    }
}

/// Single encode invocation handed to the transcoder
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    pub source: PathBuf,
    pub start: f64,
    pub duration: f64,
    pub output: PathBuf,
}

impl EncodeJob {
    pub fn for_request(source: &Path, request: &ClipRequest, output_dir: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            start: request.start,
            duration: request.duration.as_secs_f64(),
            output: output_dir.join(request.file_name()),
        }
    }
}

/// Output tree rooted at the videos directory
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    pub videos_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(videos_dir: impl Into<PathBuf>) -> Self {
        Self {
            videos_dir: videos_dir.into(),
        }
    }

    /// `{videos_dir}/{category}/{duration}`
    pub fn clip_dir(&self, category: &str, clip: ClipLength) -> Result<PathBuf, DomainError> {
        validate_category(category)?;
        Ok(self
            .videos_dir
            .join(category)
            .join(clip.seconds().to_string()))
    }
}

/// Categories name exactly one directory level
fn validate_category(category: &str) -> Result<(), DomainError> {
    let mut components = Path::new(category).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(DomainError::FsError(format!(
            "Invalid category name: {:?}",
            category
        ))),
    }
}

/// Successful run result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutReport {
    pub files: Vec<PathBuf>,
    pub count: usize,
}

impl CutReport {
    pub fn new(files: Vec<PathBuf>) -> Self {
        let count = files.len();
        Self { files, count }
    }
}

#[cfg(test)]
mod tests;
