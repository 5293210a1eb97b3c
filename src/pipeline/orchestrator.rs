//! Run orchestration: change check, then merge, classify and report in sequence.
//!
//! ```text
//! Start -> CheckChanges -> Skip
//!                       -> Process -> Merge -> Classify -> Report -> [Commit] -> Done
//!                                      \________\__________\_________\-----> Failed
//! ```
//!
//! `Commit` is only entered under [`MarkerPolicy::AfterSuccess`].
//!
//! No stage error crosses [`Orchestrator::run`]; it always returns a [`RunOutcome`].

use super::change::ChangeTracker;
use super::classify::{classify_file, ClassifyOutcome};
use super::diagnostics::Diagnostics;
use super::merge::write_merged;
use super::report::write_report;
use crate::config::{MarkerPolicy, PipelineConfig, PipelinePaths};
use crate::error::PipelineError;
use serde::Serialize;
use std::fmt;

/// Orchestrator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Start,
    CheckChanges,
    Skip,
    Process,
    Merge,
    Classify,
    Report,
    Commit,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Start => "start",
            RunState::CheckChanges => "check_changes",
            RunState::Skip => "skip",
            RunState::Process => "process",
            RunState::Merge => "merge",
            RunState::Classify => "classify",
            RunState::Report => "report",
            RunState::Commit => "commit",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Processed,
    Skipped,
    Failed { stage: String, message: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Processed)
    }

    /// Process exit code; a skip counts as failure unless `skip_is_success`.
    pub fn exit_code(&self, skip_is_success: bool) -> i32 {
        match self {
            RunOutcome::Processed => 0,
            RunOutcome::Skipped if skip_is_success => 0,
            RunOutcome::Skipped | RunOutcome::Failed { .. } => 1,
        }
    }
}

/// Everything a finished run leaves behind for the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub forced: bool,
    pub changed: Option<bool>,
    pub fingerprint: Option<String>,
    pub classify_aborted: bool,
    pub buckets: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Sequences the pipeline stages over one base directory.
pub struct Orchestrator {
    paths: PipelinePaths,
    tracker: ChangeTracker,
}

impl Orchestrator {
    pub fn new(paths: PipelinePaths, config: &PipelineConfig) -> Self {
        let tracker = ChangeTracker::new(&paths.nodes_dir, &paths.marker_file)
            .with_policy(config.marker_policy);
        Self { paths, tracker }
    }

    pub fn paths(&self) -> &PipelinePaths {
        &self.paths
    }

    /// Run once. `force` bypasses the change check's skip decision.
    pub fn run(&self, force: bool) -> RunSummary {
        let started = chrono::Local::now();
        tracing::info!(
            base_dir = %self.paths.base_dir.display(),
            started = %started.format("%Y-%m-%d %H:%M:%S"),
            force,
            "Node processing run starting"
        );

        let mut summary = RunSummary {
            outcome: RunOutcome::Processed,
            forced: force,
            changed: None,
            fingerprint: None,
            classify_aborted: false,
            buckets: Vec::new(),
            diagnostics: Diagnostics::new(),
        };
        let mut state = RunState::Start;

        transition(&mut state, RunState::CheckChanges);
        let check = match self.tracker.check(&mut summary.diagnostics) {
            Ok(check) => check,
            Err(e) => {
                summary.outcome = fail(&mut state, &e);
                return summary;
            }
        };
        summary.changed = Some(check.changed);
        summary.fingerprint = Some(check.fingerprint.clone());

        if !check.changed && !force {
            transition(&mut state, RunState::Skip);
            tracing::info!("No input changes, skipping processing");
            summary.outcome = RunOutcome::Skipped;
            return summary;
        }

        transition(&mut state, RunState::Process);
        if let Err(e) = self.process(&mut state, &check.fingerprint, &mut summary) {
            summary.outcome = fail(&mut state, &e);
            return summary;
        }

        if self.tracker.policy() == MarkerPolicy::AfterSuccess {
            transition(&mut state, RunState::Commit);
            if let Err(e) = self.tracker.commit(&check.fingerprint) {
                summary.outcome = fail(&mut state, &e);
                return summary;
            }
        }

        transition(&mut state, RunState::Done);
        tracing::info!(
            diagnostics = summary.diagnostics.len(),
            "Node processing run complete"
        );
        summary.outcome = RunOutcome::Processed;
        summary
    }

    fn process(
        &self,
        state: &mut RunState,
        fingerprint: &str,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        transition(state, RunState::Merge);
        let merged = write_merged(
            &self.paths.nodes_dir,
            &self.paths.merged_file(),
            &mut summary.diagnostics,
        )?;

        transition(state, RunState::Classify);
        match classify_file(&merged, &self.paths.output_dir, &mut summary.diagnostics)? {
            ClassifyOutcome::Written(files) => {
                summary.buckets = files.into_iter().map(|f| f.bucket).collect();
            }
            ClassifyOutcome::Aborted => summary.classify_aborted = true,
        }

        transition(state, RunState::Report);
        write_report(
            &self.paths.nodes_dir,
            &self.paths.output_dir,
            &self.paths.report_file(),
            Some(fingerprint),
            &summary.diagnostics,
        )?;
        Ok(())
    }
}

fn transition(state: &mut RunState, next: RunState) {
    tracing::debug!(from = %state, to = %next, "Run state transition");
    *state = next;
}

fn fail(state: &mut RunState, err: &PipelineError) -> RunOutcome {
    let stage = state.to_string();
    tracing::error!(%stage, error = %err, "Node processing run failed");
    transition(state, RunState::Failed);
    RunOutcome::Failed {
        stage,
        message: err.to_string(),
    }
}
