//! Per-run diagnostics: files that were skipped and steps that were abandoned.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stage a diagnostic came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Fingerprint,
    Merge,
    Classify,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fingerprint => "fingerprint",
            Stage::Merge => "merge",
            Stage::Classify => "classify",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

/// One recovered failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of reading a single input file.
#[derive(Debug)]
pub enum FileOutcome<T> {
    Read(T),
    Skipped { path: PathBuf, reason: String },
}

impl<T> FileOutcome<T> {
    pub fn from_result<E: fmt::Display>(path: &Path, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FileOutcome::Read(value),
            Err(e) => FileOutcome::Skipped {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        }
    }

    /// The read value, dropping a skip.
    pub fn ok(self) -> Option<T> {
        match self {
            FileOutcome::Read(value) => Some(value),
            FileOutcome::Skipped { .. } => None,
        }
    }
}

/// Ordered list of diagnostics collected over a run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stage: Stage, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.entries.push(Diagnostic {
            stage,
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Unwrap a file outcome, recording and warning on a skip.
    pub fn take<T>(&mut self, stage: Stage, outcome: FileOutcome<T>) -> Option<T> {
        match outcome {
            FileOutcome::Read(value) => Some(value),
            FileOutcome::Skipped { path, reason } => {
                tracing::warn!(%stage, path = %path.display(), %reason, "Skipping unreadable file");
                self.record(stage, path, reason);
                None
            }
        }
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
