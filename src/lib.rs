//! Nodeproc: Change-Aware Node File Processing
//!
//! Merges a directory of line-delimited proxy node files into one annotated document, splits
//! it into per-protocol files by URI scheme, and writes a Markdown report. A content
//! fingerprint of the inputs lets scheduled runs skip when nothing changed.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod tooling;
