//! Config composition: source ordering and default values.

pub mod merge_policy;
pub mod service;
