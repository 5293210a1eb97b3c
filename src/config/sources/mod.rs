//! Configuration sources.

pub mod auxiliary;
pub mod base_file;
pub mod environment;
