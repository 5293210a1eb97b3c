//! Configuration
//!
//! Layered configuration for a node processing run. The main file `config.yml` in the base
//! directory supplies directories, logging and pipeline options; `HB__*` environment variables
//! override it. The auxiliary `tasks.yml`, `triggers.yml` and `secrets.yml` files are carried
//! along as opaque YAML.

pub mod facade;
pub mod merge;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use workspace::directories::{init_directories, resolve_relative, DirectoriesConfig};
pub use workspace::pipeline_paths::PipelinePaths;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// When the change marker is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerPolicy {
    /// Rewrite the marker on every change check, skipped runs included.
    #[default]
    Always,
    /// Rewrite the marker only once a processed run has completed.
    AfterSuccess,
}

/// Pipeline behaviour switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub marker_policy: MarkerPolicy,

    /// Exit with success when a run is skipped because nothing changed.
    #[serde(default)]
    pub skip_is_success: bool,
}

/// Contents of `config.yml` after environment overlay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub directories: DirectoriesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Everything loaded from the base directory.
#[derive(Debug, Clone)]
pub struct ConfigBundle {
    pub main: NodeConfig,
    pub tasks: serde_yaml::Value,
    pub triggers: serde_yaml::Value,
    /// Never logged.
    pub secrets: serde_yaml::Value,
}

impl Default for ConfigBundle {
    fn default() -> Self {
        Self {
            main: NodeConfig::default(),
            tasks: sources::auxiliary::empty_mapping(),
            triggers: sources::auxiliary::empty_mapping(),
            secrets: sources::auxiliary::empty_mapping(),
        }
    }
}
