//! FFprobe adapter for media duration probing

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::domain::errors::*;
use crate::ports::*;

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: PathBuf,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter, resolving `ffprobe` on PATH
    pub fn new() -> Result<Self, DomainError> {
        let program = which::which("ffprobe")
            .map_err(|_| DomainError::ConfigError("ffprobe not found in PATH".to_string()))?;
        Ok(Self { program })
    }

    /// Use an explicit ffprobe binary
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Parse the bare `format=duration` value printed by ffprobe
pub fn parse_duration(path: &Path, stdout: &str) -> Result<f64, DomainError> {
    let raw = stdout.trim();
    let seconds: f64 = raw
        .parse()
        .map_err(|_| DomainError::probe(path, format!("unparseable duration {:?}", raw)))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(DomainError::probe(
            path,
            format!("duration must be positive, got {}", raw),
        ));
    }
    Ok(seconds)
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_duration(&self, file_path: &Path) -> Result<f64, DomainError> {
        if !file_path.is_file() {
            return Err(DomainError::probe(file_path, "file does not exist"));
        }

        let output = Command::new(&self.program)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| DomainError::probe(file_path, format!("failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::probe(
                file_path,
                stderr.lines().last().unwrap_or("ffprobe failed").to_string(),
            ));
        }

        parse_duration(file_path, &String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        let path = Path::new("in.mp4");
        assert_eq!(parse_duration(path, "123.456000\n").unwrap(), 123.456);
        assert!(parse_duration(path, "N/A\n").is_err());
        assert!(parse_duration(path, "").is_err());
        assert!(parse_duration(path, "0.000000").is_err());
        assert!(parse_duration(path, "-4").is_err());
        assert!(parse_duration(path, "inf").is_err());
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let adapter = FFprobeAdapter::with_program("ffprobe");
        let err = adapter
            .probe_duration(Path::new("/definitely/not/here.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ProbeError { .. }));
    }
}
