//! Line-delimited JSON progress reporting
//!
//! Each major phase prints one JSON object on stdout. A successful run ends
//! with `{"step": "Done!", "files": [...], "count": N}`; a failed run ends with
//! the last step and a non-empty `error`.

use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::domain::model::CutReport;
use crate::ports::ProgressPort;

/// Step label of the final success line
pub const DONE_STEP: &str = "Done!";

/// Phase progress line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressLine {
    pub step: String,
    pub error: String,
}

/// Final success line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoneLine {
    pub step: String,
    pub files: Vec<PathBuf>,
    pub count: usize,
}

impl From<&CutReport> for DoneLine {
    fn from(report: &CutReport) -> Self {
        Self {
            step: DONE_STEP.to_string(),
            files: report.files.clone(),
            count: report.count,
        }
    }
}

/// Writes progress lines to any sink, remembering the last step so a
/// terminal error can be reported against it
pub struct JsonProgressWriter<W: Write + Send> {
    inner: Mutex<WriterState<W>>,
}

struct WriterState<W> {
    out: W,
    last_step: String,
}

impl JsonProgressWriter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonProgressWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: Mutex::new(WriterState {
                out,
                last_step: String::new(),
            }),
        }
    }

    fn emit<T: Serialize>(state: &mut WriterState<W>, line: &T) {
        // Progress output is best effort; a closed stdout must not fail the run.
        if let Ok(json) = serde_json::to_string(line) {
            let _ = writeln!(state.out, "{}", json);
            let _ = state.out.flush();
        }
    }

    /// Report the start of a phase
    pub fn step(&self, step: &str) {
        if let Ok(mut state) = self.inner.lock() {
            state.last_step = step.to_string();
            let line = ProgressLine {
                step: step.to_string(),
                error: String::new(),
            };
            Self::emit(&mut state, &line);
        }
    }

    /// Report a terminal error against the last step
    pub fn error(&self, message: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let line = ProgressLine {
                step: state.last_step.clone(),
                error: message.to_string(),
            };
            Self::emit(&mut state, &line);
        }
    }

    /// Report success
    pub fn done(&self, report: &CutReport) {
        if let Ok(mut state) = self.inner.lock() {
            Self::emit(&mut state, &DoneLine::from(report));
        }
    }

    /// Recover the sink
    pub fn into_inner(self) -> Option<W> {
        self.inner.into_inner().ok().map(|state| state.out)
    }
}

#[async_trait]
impl<W: Write + Send> ProgressPort for JsonProgressWriter<W> {
    async fn step(&self, step: &str) {
        JsonProgressWriter::step(self, step);
    }
}
