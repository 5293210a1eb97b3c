//! Markdown run report.

use super::diagnostics::{Diagnostic, Diagnostics};
use super::listing::{display_name, files_with_suffix, readable};
use super::merge::NODE_SUFFIX;
use crate::error::PipelineError;
use chrono::{DateTime, Local};
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Version stamped into every report.
pub const REPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Non-blank line count of one output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFileSummary {
    pub name: String,
    pub lines: usize,
}

/// Summary computed fresh from the directories at report time.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub version: &'static str,
    pub fingerprint: Option<String>,
    pub input_files: usize,
    pub output_files: Vec<OutputFileSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunReport {
    /// Count inputs and outputs as they are on disk now.
    pub fn collect(
        nodes_dir: &Path,
        output_dir: &Path,
        fingerprint: Option<&str>,
        diagnostics: &Diagnostics,
        now: DateTime<Local>,
    ) -> Result<Self, PipelineError> {
        let input_files = files_with_suffix(nodes_dir, NODE_SUFFIX).len();

        let mut output_files = Vec::new();
        for path in readable(files_with_suffix(output_dir, ".txt")) {
            let content =
                std::fs::read_to_string(&path).map_err(|e| PipelineError::io(&path, e))?;
            output_files.push(OutputFileSummary {
                name: display_name(&path),
                lines: count_non_blank(&content),
            });
        }

        Ok(Self {
            generated_at: now.format(TIMESTAMP_FORMAT).to_string(),
            version: REPORT_VERSION,
            fingerprint: fingerprint.map(str::to_string),
            input_files,
            output_files,
            diagnostics: diagnostics.entries().to_vec(),
        })
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Node Processing Report\n\n");

        out.push_str("## Summary\n");
        out.push_str(&format!("- Generated: {}\n", self.generated_at));
        out.push_str(&format!("- Version: {}\n", self.version));
        out.push_str("- Status: complete\n");
        if let Some(ref fingerprint) = self.fingerprint {
            out.push_str(&format!("- Fingerprint: `{}`\n", fingerprint));
        }
        out.push('\n');

        out.push_str("## File Statistics\n");
        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);
        table.set_header(vec!["Kind", "Count", "Description"]);
        table.add_row(vec![
            "Input files".to_string(),
            self.input_files.to_string(),
            "node files".to_string(),
        ]);
        table.add_row(vec![
            "Output files".to_string(),
            self.output_files.len().to_string(),
            "processing results".to_string(),
        ]);
        out.push_str(&format!("{}\n\n", table));

        out.push_str("## Output Files\n");
        for file in &self.output_files {
            out.push_str(&format!("- `{}`: {} lines\n", file.name, file.lines));
        }

        if !self.diagnostics.is_empty() {
            out.push_str("\n## Diagnostics\n");
            for d in &self.diagnostics {
                out.push_str(&format!(
                    "- [{}] `{}`: {}\n",
                    d.stage,
                    d.path.display(),
                    d.reason
                ));
            }
        }
        out
    }
}

fn count_non_blank(content: &str) -> usize {
    content.lines().filter(|l| !l.trim().is_empty()).count()
}

/// Collect, render and write the report to `report_file`, overwriting it.
pub fn write_report(
    nodes_dir: &Path,
    output_dir: &Path,
    report_file: &Path,
    fingerprint: Option<&str>,
    diagnostics: &Diagnostics,
) -> Result<PathBuf, PipelineError> {
    let report = RunReport::collect(nodes_dir, output_dir, fingerprint, diagnostics, Local::now())?;
    std::fs::write(report_file, report.render_markdown())
        .map_err(|e| PipelineError::io(report_file, e))?;
    tracing::info!(
        path = %report_file.display(),
        outputs = report.output_files.len(),
        diagnostics = report.diagnostics.len(),
        "Wrote report"
    );
    Ok(report_file.to_path_buf())
}
