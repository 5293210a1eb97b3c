//! Change detection against the persisted fingerprint marker.

use super::diagnostics::Diagnostics;
use super::fingerprint::fingerprint_dir;
use crate::config::MarkerPolicy;
use crate::error::PipelineError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Result of comparing the current fingerprint with the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeCheck {
    pub changed: bool,
    pub fingerprint: String,
    pub previous: Option<String>,
}

/// Watches one directory through a single-line marker file.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    watch_dir: PathBuf,
    marker_file: PathBuf,
    policy: MarkerPolicy,
}

impl ChangeTracker {
    pub fn new(watch_dir: impl Into<PathBuf>, marker_file: impl Into<PathBuf>) -> Self {
        Self {
            watch_dir: watch_dir.into(),
            marker_file: marker_file.into(),
            policy: MarkerPolicy::Always,
        }
    }

    pub fn with_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MarkerPolicy {
        self.policy
    }

    /// Fingerprint the watched directory and compare with the marker.
    ///
    /// Under [`MarkerPolicy::Always`] the marker is overwritten before returning, whether or not
    /// anything changed. Under [`MarkerPolicy::AfterSuccess`] it is left alone until
    /// [`ChangeTracker::commit`].
    pub fn check(&self, diagnostics: &mut Diagnostics) -> Result<ChangeCheck, PipelineError> {
        let fingerprint = fingerprint_dir(&self.watch_dir, diagnostics);
        let previous = self.read_marker()?;

        if self.policy == MarkerPolicy::Always {
            self.commit(&fingerprint)?;
        }

        let changed = previous.as_deref() != Some(fingerprint.as_str());
        if changed {
            tracing::info!(fingerprint = %fingerprint, "Detected input changes");
        } else {
            tracing::info!(fingerprint = %fingerprint, "No input changes");
        }

        Ok(ChangeCheck {
            changed,
            fingerprint,
            previous,
        })
    }

    /// Persist `fingerprint` as the last-seen value.
    pub fn commit(&self, fingerprint: &str) -> Result<(), PipelineError> {
        if let Some(parent) = self.marker_file.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
            }
        }
        std::fs::write(&self.marker_file, fingerprint)
            .map_err(|e| PipelineError::io(&self.marker_file, e))
    }

    pub fn marker_file(&self) -> &Path {
        &self.marker_file
    }

    /// Marker contents, trimmed. Bytes that are not UTF-8 are replaced rather than rejected so
    /// a corrupt marker reads as a mismatch and gets overwritten.
    fn read_marker(&self) -> Result<Option<String>, PipelineError> {
        match std::fs::read(&self.marker_file) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).trim().to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PipelineError::io(&self.marker_file, e)),
        }
    }
}
