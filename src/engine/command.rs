//! FFmpeg command line builder.

use std::path::{Path, PathBuf};

use crate::domain::model::{EncodeJob, EncoderMode};
use crate::engine::EncoderSettings;

/// Builder for ffmpeg argument vectors.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Global arguments (before input arguments)
    global_args: Vec<String>,
    /// Input arguments (before -i)
    input_args: Vec<String>,
    /// Input file path
    input: PathBuf,
    /// Output arguments (after -i)
    output_args: Vec<String>,
    /// Output file path
    output: PathBuf,
}

impl FfmpegCommand {
    /// Create a new command that overwrites its output and only logs errors.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            global_args: vec![
                "-y".to_string(),
                "-hide_banner".to_string(),
                "-loglevel".to_string(),
                "error".to_string(),
            ],
            input_args: Vec::new(),
            input: input.as_ref().to_path_buf(),
            output_args: Vec::new(),
            output: output.as_ref().to_path_buf(),
        }
    }

    /// Build the command for one clip with the given encoder path.
    ///
    /// Audio is always dropped and the container is forced to MP4 so the
    /// output may use a temporary extension.
    pub fn for_clip(
        job: &EncodeJob,
        output: &Path,
        mode: EncoderMode,
        settings: &EncoderSettings,
    ) -> Self {
        let cmd = Self::new(&job.source, output);
        let cmd = match mode {
            EncoderMode::Accelerated => {
                let device = settings.vaapi_device.to_string_lossy().into_owned();
                cmd.global_arg("-init_hw_device")
                    .global_arg(format!("vaapi=va:{}", device))
                    .input_arg("-hwaccel")
                    .input_arg("vaapi")
                    .input_arg("-hwaccel_output_format")
                    .input_arg("vaapi")
                    .input_arg("-hwaccel_device")
                    .input_arg(device)
            }
            EncoderMode::Software => cmd,
        };

        let cmd = cmd.seek(job.start).duration(job.duration).no_audio();

        let cmd = match mode {
            EncoderMode::Accelerated => cmd
                .video_filter("scale_vaapi=format=nv12")
                .video_codec("h264_vaapi")
                .output_arg("-qp")
                .output_arg(settings.quality.to_string()),
            EncoderMode::Software => cmd
                .video_codec("libx264")
                .output_arg("-crf")
                .output_arg(settings.quality.to_string())
                .output_arg("-pix_fmt")
                .output_arg("yuv420p")
                .output_arg("-threads")
                .output_arg(settings.software_threads.max(1).to_string()),
        };

        cmd.output_arg("-movflags")
            .output_arg("+faststart")
            .output_arg("-f")
            .output_arg("mp4")
    }

    /// Build the one-frame `nullsrc` encode used to detect a working VAAPI setup.
    pub fn vaapi_probe(device: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-init_hw_device".to_string(),
            format!("vaapi=va:{}", device.to_string_lossy()),
            "-f".to_string(),
            "lavfi".to_string(),
            "-i".to_string(),
            "nullsrc=s=64x64:d=0.1".to_string(),
            "-vf".to_string(),
            "format=nv12,hwupload".to_string(),
            "-c:v".to_string(),
            "h264_vaapi".to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-f".to_string(),
            "null".to_string(),
            "-".to_string(),
        ]
    }

    /// Add a global argument.
    pub fn global_arg(mut self, arg: impl Into<String>) -> Self {
        self.global_args.push(arg.into());
        self
    }

    /// Add input arguments (before -i).
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add output arguments (after -i).
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Set seek position (before input).
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Set duration (before input).
    pub fn duration(self, seconds: f64) -> Self {
        self.input_arg("-t").input_arg(format!("{:.3}", seconds))
    }

    /// Drop all audio streams.
    pub fn no_audio(self) -> Self {
        self.output_arg("-an")
    }

    /// Set video filter.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Set video codec.
    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    /// Full argument vector (without the program name).
    pub fn build_args(&self) -> Vec<String> {
        let mut args = self.global_args.clone();
        args.extend(self.input_args.iter().cloned());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());
        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().into_owned());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> EncodeJob {
        EncodeJob {
            source: PathBuf::from("/dl/source.webm"),
            start: 42.0,
            duration: 30.0,
            output: PathBuf::from("/videos/mc/30/bg_001.mp4"),
        }
    }

    fn settings() -> EncoderSettings {
        EncoderSettings {
            vaapi_device: PathBuf::from("/dev/dri/renderD129"),
            quality: 18,
            software_threads: 4,
        }
    }

    fn position(args: &[String], value: &str) -> usize {
        args.iter().position(|a| a == value).unwrap()
    }

    #[test]
    fn test_accelerated_clip_args() {
        let args = FfmpegCommand::for_clip(
            &job(),
            Path::new("/videos/mc/30/.bg_001.mp4.part"),
            EncoderMode::Accelerated,
            &settings(),
        )
        .build_args();

        assert!(args.contains(&"vaapi=va:/dev/dri/renderD129".to_string()));
        assert!(args.contains(&"h264_vaapi".to_string()));
        assert!(args.contains(&"scale_vaapi=format=nv12".to_string()));
        assert_eq!(args[position(&args, "-qp") + 1], "18");
        assert_eq!(args[position(&args, "-ss") + 1], "42.000");
        assert_eq!(args[position(&args, "-t") + 1], "30.000");
        assert!(position(&args, "-ss") < position(&args, "-i"));
        assert!(args.contains(&"-an".to_string()));
        assert_eq!(args.last().unwrap(), "/videos/mc/30/.bg_001.mp4.part");
    }

    #[test]
    fn test_software_clip_args() {
        let args = FfmpegCommand::for_clip(
            &job(),
            Path::new("out.part"),
            EncoderMode::Software,
            &settings(),
        )
        .build_args();

        assert!(args.contains(&"libx264".to_string()));
        assert_eq!(args[position(&args, "-crf") + 1], "18");
        assert_eq!(args[position(&args, "-threads") + 1], "4");
        assert_eq!(args[position(&args, "-f") + 1], "mp4");
        assert!(args.contains(&"-an".to_string()));
        assert!(!args.iter().any(|a| a.contains("vaapi")));
    }

    #[test]
    fn test_vaapi_probe_args() {
        let args = FfmpegCommand::vaapi_probe(Path::new("/dev/dri/renderD128"));
        assert_eq!(args[2], "vaapi=va:/dev/dri/renderD128");
        assert_eq!(args.last().unwrap(), "-");
    }
}
