use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::Result;
use crate::request::GenerationRequest;

/// Audit record of the issue that triggered a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub identifier: String,
    pub title: String,
    pub body: String,
}

impl TraceRecord {
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            identifier: request.identifier().to_string(),
            title: request.title().to_string(),
            body: request.body().to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "# Issue #{}\n\n## {}\n\n{}\n",
            self.identifier, self.title, self.body
        )
    }

    /// Location relative to the output root.
    pub fn relative_path(&self, trace_dir: &str) -> String {
        format!(
            "{}/issue-{}.md",
            trace_dir.trim_end_matches('/'),
            self.identifier
        )
    }
}

#[derive(Debug, Clone)]
pub struct TraceRecorder {
    root: PathBuf,
    trace_dir: String,
}

impl TraceRecorder {
    pub fn new(root: impl Into<PathBuf>, trace_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            trace_dir: trace_dir.into(),
        }
    }

    pub fn path_for(&self, record: &TraceRecord) -> PathBuf {
        self.root.join(record.relative_path(&self.trace_dir))
    }

    pub fn record(&self, record: &TraceRecord) -> Result<PathBuf> {
        let path = self.path_for(record);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, record.render())?;
        info!(path = %path.display(), "wrote trace document");
        Ok(path)
    }

    /// Arm a guard that writes `record` exactly once, at the latest when dropped.
    pub fn guard(&self, record: TraceRecord) -> TraceGuard<'_> {
        TraceGuard {
            recorder: self,
            record,
            outcome: None,
        }
    }
}

/// Scoped trace write: [`TraceGuard::flush`] writes early, `Drop` covers every other exit.
///
/// Failures are logged and never propagated.
#[derive(Debug)]
pub struct TraceGuard<'a> {
    recorder: &'a TraceRecorder,
    record: TraceRecord,
    outcome: Option<Option<PathBuf>>,
}

impl TraceGuard<'_> {
    /// Write the trace now if not yet written; returns its path when the write succeeded.
    pub fn flush(&mut self) -> Option<PathBuf> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = match self.recorder.record(&self.record) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(error = %err, "failed to write trace document");
                None
            }
        };
        self.outcome = Some(outcome.clone());
        outcome
    }
}

impl Drop for TraceGuard<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
