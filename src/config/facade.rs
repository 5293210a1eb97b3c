//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::sources::auxiliary;
use super::ConfigBundle;
use crate::error::PipelineError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load `config.yml` and the auxiliary files from the base directory.
    ///
    /// Missing files are treated as empty configuration.
    pub fn load(base_dir: &Path) -> Result<ConfigBundle, PipelineError> {
        let main = MergeService::load(base_dir)?;
        Ok(ConfigBundle {
            main,
            tasks: auxiliary::load(base_dir, auxiliary::TASKS_FILE)?,
            triggers: auxiliary::load(base_dir, auxiliary::TRIGGERS_FILE)?,
            secrets: auxiliary::load(base_dir, auxiliary::SECRETS_FILE)?,
        })
    }
}
