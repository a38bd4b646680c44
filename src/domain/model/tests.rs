// Unit tests for domain models

#[cfg(test)]
mod tests {
    use crate::domain::model::*;

    #[test]
    fn test_clip_length_from_seconds() {
        assert_eq!(ClipLength::try_from(30).unwrap(), ClipLength::Thirty);
        assert_eq!(ClipLength::try_from(60).unwrap(), ClipLength::Sixty);
        assert_eq!(ClipLength::Sixty.as_secs_f64(), 60.0);
        assert_eq!(ClipLength::Thirty.to_string(), "30");
    }

    #[test]
    fn test_clip_length_rejects_other_values() {
        for seconds in [0, 15, 45, 90] {
            assert!(matches!(
                ClipLength::try_from(seconds),
                Err(DomainError::InvalidDuration(_))
            ));
        }
    }

    #[test]
    fn test_trim_window_for_long_source() {
        let window = TrimWindow::new(100.0, ClipLength::Thirty);
        assert_eq!(window.start, 10.0);
        assert_eq!(window.end, 90.0);
        assert_eq!(window.usable(), 80.0);
        assert_eq!(window.capacity(ClipLength::Thirty), 2);
    }

    #[test]
    fn test_trim_window_end_is_clamped() {
        let window = TrimWindow::new(35.0, ClipLength::Thirty);
        assert_eq!(window.end, 40.0);
        assert_eq!(window.usable(), 30.0);
    }

    #[test]
    fn test_candidate_starts_grid() {
        let window = TrimWindow::new(100.0, ClipLength::Thirty);
        let starts = window.candidate_starts(ClipLength::Thirty);
        assert_eq!(starts.len(), 51);
        assert_eq!(starts.first().copied(), Some(10.0));
        assert_eq!(starts.last().copied(), Some(60.0));
    }

    #[test]
    fn test_candidate_starts_fractional_total() {
        let window = TrimWindow::new(100.7, ClipLength::Sixty);
        let starts = window.candidate_starts(ClipLength::Sixty);
        // usable 80.7 -> floor(20.7) + 1
        assert_eq!(starts.len(), 21);
        assert!(starts.iter().all(|t| t + 60.0 <= window.end));
    }

    #[test]
    fn test_clip_file_names() {
        assert_eq!(clip_file_name(3), "bg_003.mp4");
        assert_eq!(clip_file_name(1234), "bg_1234.mp4");
        let request = ClipRequest::new(12, 42.0, ClipLength::Thirty);
        assert_eq!(request.file_name(), "bg_012.mp4");
        assert_eq!(request.end(), 72.0);
    }

    #[test]
    fn test_is_clip_file_name() {
        assert!(is_clip_file_name("bg_001.mp4"));
        assert!(is_clip_file_name("bg_1000.mp4"));
        assert!(!is_clip_file_name("bg_.mp4"));
        assert!(!is_clip_file_name("bg_001.mkv"));
        assert!(!is_clip_file_name(".bg_001.mp4.part"));
        assert!(!is_clip_file_name("other.mp4"));
        assert!(!is_clip_file_name("bg_01a.mp4"));
    }

    #[test]
    fn test_output_layout_clip_dir() {
        let layout = OutputLayout::new("/srv/videos");
        let dir = layout.clip_dir("minecraft", ClipLength::Sixty).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/videos/minecraft/60"));
    }

    #[test]
    fn test_output_layout_rejects_nested_category() {
        let layout = OutputLayout::new("videos");
        assert!(layout.clip_dir("", ClipLength::Thirty).is_err());
        assert!(layout.clip_dir("..", ClipLength::Thirty).is_err());
        assert!(layout.clip_dir("a/b", ClipLength::Thirty).is_err());
        assert!(layout.clip_dir("/abs", ClipLength::Thirty).is_err());
    }

    #[test]
    fn test_encode_job_for_request() {
        let request = ClipRequest::new(4, 25.0, ClipLength::Sixty);
        let job =
            EncodeJob::for_request(Path::new("/tmp/source.webm"), &request, Path::new("/out"));
        assert_eq!(job.output, PathBuf::from("/out/bg_004.mp4"));
        assert_eq!(job.start, 25.0);
        assert_eq!(job.duration, 60.0);
    }

    #[test]
    fn test_cut_report_counts_files() {
        let report = CutReport::new(vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]);
        assert_eq!(report.count, 2);
    }
}
