//! CLI Tooling
//!
//! Command-line interface for a node processing run. Loads configuration from the base
//! directory, prepares directories and logging, then hands over to the orchestrator.

use crate::config::{init_directories, ConfigBundle, ConfigLoader, PipelinePaths};
use crate::error::PipelineError;
use crate::logging::{LoggingContext, LoggingOverrides};
use crate::pipeline::{Orchestrator, RunOutcome, RunSummary};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

/// Nodeproc CLI - merge and split proxy node files by protocol
#[derive(Parser, Debug)]
#[command(name = "nodeproc")]
#[command(about = "Merge node files and split them by protocol when inputs change")]
pub struct Cli {
    /// Run even if the node files are unchanged
    #[arg(long)]
    pub force: bool,

    /// Base configuration and working directory
    #[arg(long, default_value = "hb")]
    pub config: PathBuf,

    /// Summary output format (text or json)
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn logging_overrides(&self) -> LoggingOverrides {
        LoggingOverrides {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

/// Loaded configuration, prepared directories and logging for one invocation.
pub struct CliContext {
    bundle: ConfigBundle,
    logging: LoggingContext,
    orchestrator: Orchestrator,
}

impl CliContext {
    pub fn new(base_dir: PathBuf, overrides: &LoggingOverrides) -> Result<Self, PipelineError> {
        let bundle = ConfigLoader::load(&base_dir)?;
        let created = init_directories(&bundle.main.directories, &base_dir)?;
        let logging = LoggingContext::build(&bundle.main.logging, overrides, &base_dir)?;

        logging.in_scope(|| {
            for dir in &created {
                info!(path = %dir.display(), "Prepared directory");
            }
            info!(
                tasks = yaml_len(&bundle.tasks),
                triggers = yaml_len(&bundle.triggers),
                "Loaded configuration"
            );
        });

        let orchestrator = Orchestrator::new(PipelinePaths::from_base(&base_dir), &bundle.main.pipeline);
        Ok(Self {
            bundle,
            logging,
            orchestrator,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.orchestrator.paths().base_dir
    }

    /// Run the pipeline inside this context's logging scope.
    pub fn execute(&self, force: bool) -> RunSummary {
        self.logging.in_scope(|| self.orchestrator.run(force))
    }

    pub fn exit_code(&self, summary: &RunSummary) -> i32 {
        summary
            .outcome
            .exit_code(self.bundle.main.pipeline.skip_is_success)
    }
}

fn yaml_len(value: &serde_yaml::Value) -> usize {
    value.as_mapping().map(|m| m.len()).unwrap_or(0)
}

/// Render a run summary for stdout.
pub fn format_summary(summary: &RunSummary, format: &str) -> Result<String, PipelineError> {
    match format {
        "json" => serde_json::to_string_pretty(summary)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize summary: {}", e))),
        "text" => Ok(format_summary_text(summary)),
        other => Err(PipelineError::Config(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

fn format_summary_text(summary: &RunSummary) -> String {
    let mut line = match &summary.outcome {
        RunOutcome::Processed => {
            if summary.classify_aborted {
                "Processed: classification aborted".to_string()
            } else if summary.buckets.is_empty() {
                "Processed: no node lines".to_string()
            } else {
                format!(
                    "Processed: {} bucket file(s) [{}]",
                    summary.buckets.len(),
                    summary.buckets.join(", ")
                )
            }
        }
        RunOutcome::Skipped => "Skipped: no input changes".to_string(),
        RunOutcome::Failed { stage, message } => {
            format!("Failed during {}: {}", stage, message)
        }
    };
    if !summary.diagnostics.is_empty() {
        line.push_str(&format!(", {} diagnostic(s)", summary.diagnostics.len()));
    }
    line
}
