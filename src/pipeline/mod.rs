//! Node Processing Pipeline
//!
//! Change detection, merge with provenance, protocol classification and reporting over a
//! directory of line-delimited node files. Runs single-threaded; concurrent runs against the
//! same base directory are not coordinated.

pub mod change;
pub mod classify;
pub mod diagnostics;
pub mod fingerprint;
mod listing;
pub mod merge;
pub mod orchestrator;
pub mod report;

pub use change::{ChangeCheck, ChangeTracker};
pub use classify::{
    classify_file, BucketFile, Classification, ClassifyOutcome, Protocol, OTHER_BUCKET, PROTOCOLS,
};
pub use diagnostics::{Diagnostic, Diagnostics, FileOutcome, Stage};
pub use fingerprint::{fingerprint_dir, EMPTY_FINGERPRINT};
pub use merge::write_merged;
pub use orchestrator::{Orchestrator, RunOutcome, RunState, RunSummary};
pub use report::{write_report, RunReport};
