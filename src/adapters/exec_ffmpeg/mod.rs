//! FFmpeg execution adapter
//!
//! Runs one ffmpeg process per clip. Output is written to a hidden `.part`
//! sibling and renamed into place only after ffmpeg reports success, so a
//! failed attempt never leaves a file under the final clip name.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::{EncoderSettings, FfmpegCommand};
use crate::ports::*;

/// Upper bound for the VAAPI test encode
const ACCELERATOR_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: PathBuf,
    settings: EncoderSettings,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter, resolving `ffmpeg` on PATH
    pub fn new(settings: EncoderSettings) -> Result<Self, DomainError> {
        let program = which::which("ffmpeg")
            .map_err(|_| DomainError::ConfigError("ffmpeg not found in PATH".to_string()))?;
        Ok(Self { program, settings })
    }

    /// Use an explicit ffmpeg binary
    pub fn with_program(program: impl Into<PathBuf>, settings: EncoderSettings) -> Self {
        Self {
            program: program.into(),
            settings,
        }
    }

    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), String> {
        debug!("ffmpeg {}", args.join(" "));
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to run ffmpeg: {}", e))?;

        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no error output");
        Err(match output.status.code() {
            Some(code) => format!("ffmpeg exited with status {}: {}", code, reason),
            None => format!("ffmpeg terminated by signal: {}", reason),
        })
    }
}

/// Hidden temporary path next to the final clip
pub fn part_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clip".to_string());
    output.with_file_name(format!(".{}.part", name))
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => debug!("Could not remove partial output {}: {}", path.display(), e),
    }
}

#[async_trait]
impl EncodePort for FFmpegAdapter {
    async fn accelerator_available(&self) -> bool {
        if !self.settings.vaapi_device.exists() {
            debug!(
                "VAAPI device {} not present",
                self.settings.vaapi_device.display()
            );
            return false;
        }

        let args = FfmpegCommand::vaapi_probe(&self.settings.vaapi_device);
        match tokio::time::timeout(ACCELERATOR_PROBE_TIMEOUT, self.run_ffmpeg(&args)).await {
            Ok(Ok(())) => true,
            Ok(Err(reason)) => {
                debug!("VAAPI test encode failed: {}", reason);
                false
            }
            Err(_) => {
                debug!("VAAPI test encode timed out");
                false
            }
        }
    }

    async fn encode(&self, job: &EncodeJob, mode: EncoderMode) -> Result<(), DomainError> {
        let part = part_path(&job.output);
        remove_if_present(&part).await;

        let args = FfmpegCommand::for_clip(job, &part, mode, &self.settings).build_args();
        if let Err(reason) = self.run_ffmpeg(&args).await {
            remove_if_present(&part).await;
            return Err(DomainError::encode(&job.output, reason));
        }

        match tokio::fs::metadata(&part).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => {
                remove_if_present(&part).await;
                return Err(DomainError::encode(
                    &job.output,
                    "ffmpeg reported success but produced no output",
                ));
            }
        }

        if let Err(e) = tokio::fs::rename(&part, &job.output).await {
            remove_if_present(&part).await;
            return Err(DomainError::encode(
                &job.output,
                format!("failed to finalize clip: {}", e),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_path_is_hidden_sibling() {
        assert_eq!(
            part_path(Path::new("/videos/mc/30/bg_004.mp4")),
            PathBuf::from("/videos/mc/30/.bg_004.mp4.part")
        );
    }

    #[tokio::test]
    async fn test_missing_device_disables_accelerator() {
        let settings = EncoderSettings::default().with_vaapi_device("/nonexistent/renderD999");
        let adapter = FFmpegAdapter::with_program("ffmpeg", settings);
        assert!(!adapter.accelerator_available().await);
    }

    #[tokio::test]
    async fn test_failed_encode_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let job = EncodeJob {
            source: dir.path().join("missing.webm"),
            start: 10.0,
            duration: 30.0,
            output: dir.path().join("bg_001.mp4"),
        };
        let adapter = FFmpegAdapter::with_program(
            dir.path().join("no-such-ffmpeg"),
            EncoderSettings::default(),
        );

        let err = adapter.encode(&job, EncoderMode::Software).await.unwrap_err();
        assert!(matches!(err, DomainError::EncodeError { .. }));
        assert!(!job.output.exists());
        assert!(!part_path(&job.output).exists());
    }

    /// Fake ffmpeg that runs `body` with the output path in `$out`
    fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-ffmpeg");
        let text = format!("#!/bin/sh\nfor out in \"$@\"; do :; done\n{}\n", body);
        std::fs::write(&script, text).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    fn clip_job(dir: &Path) -> EncodeJob {
        EncodeJob {
            source: dir.join("source.webm"),
            start: 10.0,
            duration: 30.0,
            output: dir.join("bg_001.mp4"),
        }
    }

    fn dir_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_partial_write_then_failure_is_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_ffmpeg(
            dir.path(),
            "printf 'half a clip' > \"$out\"\necho boom >&2\nexit 1",
        );
        let adapter = FFmpegAdapter::with_program(program, EncoderSettings::default());
        let job = clip_job(dir.path());

        let err = adapter.encode(&job, EncoderMode::Software).await.unwrap_err();
        match err {
            DomainError::EncodeError { message, .. } => {
                assert_eq!(message, "ffmpeg exited with status 1: boom")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(dir_names(dir.path()), vec!["fake-ffmpeg"]);
    }

    #[tokio::test]
    async fn test_successful_encode_renames_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_ffmpeg(dir.path(), "printf 'encoded clip' > \"$out\"\nexit 0");
        let adapter = FFmpegAdapter::with_program(program, EncoderSettings::default());
        let job = clip_job(dir.path());

        adapter.encode(&job, EncoderMode::Software).await.unwrap();
        assert_eq!(std::fs::read(&job.output).unwrap(), b"encoded clip");
        assert!(!part_path(&job.output).exists());
        assert_eq!(dir_names(dir.path()), vec!["bg_001.mp4", "fake-ffmpeg"]);
    }

    #[tokio::test]
    async fn test_empty_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let program = fake_ffmpeg(dir.path(), ": > \"$out\"\nexit 0");
        let adapter = FFmpegAdapter::with_program(program, EncoderSettings::default());
        let job = clip_job(dir.path());

        let err = adapter.encode(&job, EncoderMode::Software).await.unwrap_err();
        assert!(err.to_string().contains("produced no output"));
        assert_eq!(dir_names(dir.path()), vec!["fake-ffmpeg"]);
    }
}
