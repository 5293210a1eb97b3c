//! Protocol classification of the merged document.
//!
//! Each non-blank, non-comment line lands in exactly one bucket: the first protocol in
//! [`PROTOCOLS`] whose scheme prefix matches case-insensitively, or `other`.

use super::diagnostics::{Diagnostics, Stage};
use crate::error::PipelineError;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A recognised URI scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocol {
    pub name: &'static str,
    pub prefix: &'static str,
}

pub const PROTOCOL_COUNT: usize = 8;

/// Protocol table in matching order.
pub static PROTOCOLS: [Protocol; PROTOCOL_COUNT] = [
    Protocol { name: "vless", prefix: "vless://" },
    Protocol { name: "vmess", prefix: "vmess://" },
    Protocol { name: "trojan", prefix: "trojan://" },
    Protocol { name: "ss", prefix: "ss://" },
    Protocol { name: "ssr", prefix: "ssr://" },
    Protocol { name: "http", prefix: "http://" },
    Protocol { name: "https", prefix: "https://" },
    Protocol { name: "socks5", prefix: "socks5://" },
];

/// Bucket for lines matching no protocol.
pub const OTHER_BUCKET: &str = "other";

/// Lines starting with this marker are comments.
pub const COMMENT_MARKER: char = '#';

/// Index into [`PROTOCOLS`] of the first protocol whose prefix starts `line`.
pub fn match_protocol(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    PROTOCOLS.iter().position(|protocol| {
        let prefix = protocol.prefix.as_bytes();
        bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
    })
}

/// Trimmed line if it should be classified, `None` for blank and comment lines.
pub fn classifiable(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
        None
    } else {
        Some(trimmed)
    }
}

/// Partitioned lines, order preserved within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    protocols: [Vec<String>; PROTOCOL_COUNT],
    other: Vec<String>,
}

impl Classification {
    pub fn push(&mut self, line: &str) {
        match match_protocol(line) {
            Some(idx) => self.protocols[idx].push(line.to_string()),
            None => self.other.push(line.to_string()),
        }
    }

    /// Lines of the named bucket; empty for unknown names.
    pub fn bucket(&self, name: &str) -> &[String] {
        if name == OTHER_BUCKET {
            return &self.other;
        }
        PROTOCOLS
            .iter()
            .position(|p| p.name == name)
            .map(|idx| self.protocols[idx].as_slice())
            .unwrap_or(&[])
    }

    /// Every bucket in table order, `other` last.
    pub fn buckets(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        PROTOCOLS
            .iter()
            .zip(self.protocols.iter())
            .map(|(p, lines)| (p.name, lines.as_slice()))
            .chain(std::iter::once((OTHER_BUCKET, self.other.as_slice())))
    }

    pub fn total(&self) -> usize {
        self.buckets().map(|(_, lines)| lines.len()).sum()
    }
}

/// Classify every line read from `reader`.
pub fn classify_reader<R: BufRead>(reader: R) -> std::io::Result<Classification> {
    let mut classification = Classification::default();
    for line in reader.lines() {
        let line = line?;
        if let Some(trimmed) = classifiable(&line) {
            classification.push(trimmed);
        }
    }
    Ok(classification)
}

/// One written bucket file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketFile {
    pub bucket: String,
    pub path: PathBuf,
    pub lines: usize,
}

/// What the classify step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyOutcome {
    Written(Vec<BucketFile>),
    /// The merged document could not be read; no output was touched.
    Aborted,
}

/// Write each non-empty bucket to `<bucket>.txt` and remove files of empty buckets.
pub fn write_buckets(
    classification: &Classification,
    output_dir: &Path,
) -> Result<Vec<BucketFile>, PipelineError> {
    std::fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;

    let mut written = Vec::new();
    for (bucket, lines) in classification.buckets() {
        let path = output_dir.join(format!("{}.txt", bucket));
        if lines.is_empty() {
            if path.is_file() {
                std::fs::remove_file(&path).map_err(|e| PipelineError::io(&path, e))?;
                tracing::debug!(path = %path.display(), "Removed stale bucket file");
            }
            continue;
        }
        std::fs::write(&path, lines.join("\n")).map_err(|e| PipelineError::io(&path, e))?;
        tracing::info!(path = %path.display(), lines = lines.len(), "Wrote bucket file");
        written.push(BucketFile {
            bucket: bucket.to_string(),
            path,
            lines: lines.len(),
        });
    }
    Ok(written)
}

/// Classify the merged document at `input` into bucket files under `output_dir`.
///
/// A read failure on `input` is logged, recorded, and reported as [`ClassifyOutcome::Aborted`];
/// only write failures are errors.
pub fn classify_file(
    input: &Path,
    output_dir: &Path,
    diagnostics: &mut Diagnostics,
) -> Result<ClassifyOutcome, PipelineError> {
    tracing::info!(input = %input.display(), "Splitting merged document by protocol");

    let read = File::open(input).and_then(|file| classify_reader(BufReader::new(file)));
    let classification = match read {
        Ok(classification) => classification,
        Err(e) => {
            tracing::error!(input = %input.display(), error = %e, "Failed to read merged document");
            diagnostics.record(Stage::Classify, input, e.to_string());
            return Ok(ClassifyOutcome::Aborted);
        }
    };

    let written = write_buckets(&classification, output_dir)?;
    Ok(ClassifyOutcome::Written(written))
}
