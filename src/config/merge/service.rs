//! MergeService: orchestrates sources, applies merge policy, deserializes to NodeConfig.

use crate::config::sources::{base_file, environment};
use crate::config::NodeConfig;
use config::ConfigError;
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from the base directory.
    /// Precedence: defaults (lowest) -> `<base>/config.yml` -> environment (highest).
    pub fn load(base_dir: &Path) -> Result<NodeConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = base_file::add_to_builder(builder, base_dir)?;
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }
}
