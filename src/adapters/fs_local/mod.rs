// Local filesystem adapter - Output tree preparation and clip ordinal scanning

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use async_trait::async_trait;
use std::path::Path;
use walkdir::WalkDir;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }

    /// Count clip files directly inside a directory (no recursion)
    fn count_clips_sync(dir_path: &Path) -> Result<u32, DomainError> {
        if !dir_path.is_dir() {
            return Ok(0);
        }

        let mut count = 0u32;
        for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                DomainError::FsError(format!(
                    "Failed to scan {}: {}",
                    dir_path.display(),
                    e
                ))
            })?;
            if entry.file_type().is_file()
                && is_clip_file_name(&entry.file_name().to_string_lossy())
            {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(dir_path).await.map_err(|e| {
            DomainError::FsError(format!(
                "Failed to create directory {}: {}",
                dir_path.display(),
                e
            ))
        })
    }

    async fn count_clips(&self, dir_path: &Path) -> Result<u32, DomainError> {
        let dir = dir_path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::count_clips_sync(&dir))
            .await
            .map_err(|e| DomainError::FsError(format!("Clip scan task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_count_clips_matches_pattern_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["bg_001.mp4", "bg_002.mp4", "notes.txt", "other.mp4", ".bg_003.mp4.part"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("bg_009.mp4")).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("bg_004.mp4"), b"x").unwrap();

        let adapter = FsLocalAdapter::new().unwrap();
        assert_eq!(adapter.count_clips(dir.path()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_count_clips_missing_directory_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = FsLocalAdapter::new().unwrap();
        assert_eq!(adapter.count_clips(&dir.path().join("absent")).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_count_clips_runs_off_the_async_workers() {
        let dir = tempfile::tempdir().unwrap();
        for ordinal in 1..=40 {
            std::fs::write(dir.path().join(clip_file_name(ordinal)), b"x").unwrap();
        }
        let adapter = std::sync::Arc::new(FsLocalAdapter::new().unwrap());

        let scans: Vec<_> = (0..8)
            .map(|_| {
                let adapter = std::sync::Arc::clone(&adapter);
                let dir = dir.path().to_path_buf();
                tokio::spawn(async move { adapter.count_clips(&dir).await })
            })
            .collect();
        for scan in scans {
            assert_eq!(scan.await.unwrap().unwrap(), 40);
        }
    }

    #[tokio::test]
    async fn test_create_directory_nested() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("minecraft").join("30");
        let adapter = FsLocalAdapter::new().unwrap();
        adapter.create_directory(&target).await.unwrap();
        assert!(target.is_dir());
    }
}
