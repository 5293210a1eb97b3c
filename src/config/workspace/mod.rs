//! Base-directory layout: configured directories and the fixed pipeline paths.

pub mod directories;
pub mod pipeline_paths;
