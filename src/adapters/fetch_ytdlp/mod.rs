//! Source video download using yt-dlp.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Video-only, highest bitrate up to 1440p
const FORMAT_SELECTOR: &str = "bestvideo[height<=1440]/best[height<=1440]";
const FORMAT_SORT: &str = "res:1440,vbr,fps";
const MAX_FILESIZE: &str = "5G";

/// Base name of the downloaded file; yt-dlp picks the extension
const OUTPUT_TEMPLATE: &str = "source.%(ext)s";

/// Marker for the line yt-dlp prints once the format is chosen
const SELECTION_MARKER: &str = "bgclip-selected:";
const SELECTION_TEMPLATE: &str =
    "before_dl:bgclip-selected:%(format_id)s|%(height)s|%(vbr)s|%(filesize,filesize_approx)s";

/// Containers accepted as the downloaded source
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "webm", "avi", "mov"];

/// yt-dlp based fetch adapter
pub struct YtDlpAdapter {
    program: PathBuf,
}

impl YtDlpAdapter {
    /// Create new adapter, resolving `yt-dlp` on PATH
    pub fn new() -> Result<Self, DomainError> {
        let program = which::which("yt-dlp")
            .map_err(|_| DomainError::ConfigError("yt-dlp not found in PATH".to_string()))?;
        Ok(Self { program })
    }

    /// Use an explicit yt-dlp binary
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument vector for one download
    pub fn download_args(url: &str, dest_dir: &Path) -> Vec<String> {
        let template = dest_dir.join(OUTPUT_TEMPLATE);
        let mut args: Vec<String> = [
            "-f",
            FORMAT_SELECTOR,
            "-S",
            FORMAT_SORT,
            "--no-playlist",
            "--max-filesize",
            MAX_FILESIZE,
            "--concurrent-fragments",
            "8",
            "--buffer-size",
            "256K",
            "--retries",
            "15",
            "--fragment-retries",
            "15",
            "--file-access-retries",
            "5",
            "--extractor-retries",
            "5",
            "--no-progress",
            "--no-simulate",
            "--print",
            SELECTION_TEMPLATE,
            "-o",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(template.to_string_lossy().into_owned());
        args.push(url.to_string());
        args
    }
}

/// Format yt-dlp picked for a download
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSelection {
    pub format_id: String,
    pub height: Option<u32>,
    pub vbr: Option<f64>,
    pub size_bytes: Option<u64>,
}

impl FormatSelection {
    /// Parse one stdout line; `None` for anything but the selection line
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().strip_prefix(SELECTION_MARKER)?.split('|').collect();
        let [format_id, height, vbr, size] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            format_id: format_id.to_string(),
            height: height.parse().ok(),
            vbr: vbr.parse().ok(),
            size_bytes: size.parse::<f64>().ok().map(|bytes| bytes as u64),
        })
    }

    fn log(&self) {
        let height = self.height.map_or("?".to_string(), |h| format!("{}p", h));
        let vbr = self.vbr.map_or("?".to_string(), |v| format!("{:.0}k", v));
        let size_mb = self.size_bytes.unwrap_or(0) as f64 / (1024.0 * 1024.0);
        info!(
            "Selected format {} | {} | vbr={} | ~{:.0}MB",
            self.format_id, height, vbr, size_mb
        );
    }
}

/// Strip timestamps and tracking parameters, keeping only the video id (`v`).
pub fn clean_url(raw: &str) -> Result<String, DomainError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| DomainError::FetchError(format!("invalid URL {:?}: {}", raw, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key == "v")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept.iter());
    }
    Ok(url.to_string())
}

/// First video file directly inside `dir`, by name
pub fn find_downloaded_video(dir: &Path) -> Result<PathBuf, DomainError> {
    let mut entries: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    entries.sort();

    entries
        .iter()
        .find(|path| {
            path.extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    VIDEO_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        })
        .cloned()
        .ok_or_else(|| {
            let contents: Vec<String> = entries
                .iter()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();
            DomainError::FetchError(format!(
                "Download completed but no video file found in {}. Directory contents: {:?}",
                dir.display(),
                contents
            ))
        })
}

#[async_trait]
impl FetchPort for YtDlpAdapter {
    async fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, DomainError> {
        let url = clean_url(url)?;
        info!("Downloading {} into {}", url, dest_dir.display());

        let mut child = Command::new(&self.program)
            .args(Self::download_args(&url, dest_dir))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DomainError::FetchError(format!("failed to run yt-dlp: {}", e)))?;

        // Drain stderr alongside stdout so neither pipe fills up.
        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match FormatSelection::parse(&line) {
                    Some(selection) => selection.log(),
                    None => debug!("yt-dlp: {}", line),
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DomainError::FetchError(format!("failed to wait for yt-dlp: {}", e)))?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            debug!("yt-dlp stderr: {}", stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("Unknown error");
            return Err(DomainError::FetchError(format!("yt-dlp failed: {}", reason)));
        }

        let video = find_downloaded_video(dest_dir)?;
        let size = tokio::fs::metadata(&video).await.map(|m| m.len()).unwrap_or(0);
        info!(
            output = %video.display(),
            size_mb = size as f64 / (1024.0 * 1024.0),
            "Downloaded source video"
        );
        Ok(video)
    }
}
