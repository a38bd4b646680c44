//! Command-line argument definitions

use clap::Args;
use std::path::PathBuf;

use crate::domain::model::ClipLength;

/// Clips cut per run when `--clips` is absent
pub const DEFAULT_CLIPS: u32 = 5;

/// Parse `--duration`, accepting only the supported clip lengths
pub fn parse_clip_length(value: &str) -> Result<ClipLength, String> {
    let seconds: u32 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    ClipLength::try_from(seconds).map_err(|e| e.to_string())
}

/// Parse `--clips`, which must be at least one
pub fn parse_clip_count(value: &str) -> Result<u32, String> {
    clap_num::number_range(value, 1, u32::MAX)
}

/// Arguments shared by the clip-producing commands
#[derive(Args, Debug, Clone)]
pub struct ClipTarget {
    /// Background category (e.g. minecraft)
    #[arg(long)]
    pub category: String,

    /// Clip duration in seconds (30 or 60)
    #[arg(long, value_parser = parse_clip_length)]
    pub duration: ClipLength,

    /// Number of clips to cut
    #[arg(long, default_value_t = DEFAULT_CLIPS, value_parser = parse_clip_count)]
    pub clips: u32,

    /// Root of the output tree
    #[arg(long)]
    pub videos_dir: Option<PathBuf>,

    /// Fixed seed for clip selection
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the fetch command
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Video URL
    #[arg(long)]
    pub url: String,

    /// Existing directory for temporary downloads (default: YT_DOWNLOAD_DIR)
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    #[command(flatten)]
    pub target: ClipTarget,
}

/// Arguments for the cut command
#[derive(Args, Debug)]
pub struct CutArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub target: ClipTarget,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clip_length() {
        assert_eq!(parse_clip_length("30"), Ok(ClipLength::Thirty));
        assert_eq!(parse_clip_length("60"), Ok(ClipLength::Sixty));
        assert!(parse_clip_length("45").is_err());
        assert!(parse_clip_length("sixty").is_err());
    }

    #[test]
    fn test_parse_clip_count() {
        assert_eq!(parse_clip_count("3"), Ok(3));
        assert!(parse_clip_count("0").is_err());
        assert!(parse_clip_count("-1").is_err());
    }
}
