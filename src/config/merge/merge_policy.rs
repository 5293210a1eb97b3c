//! Default values applied beneath every configuration source.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the pipeline defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("pipeline.marker_policy", "always")?
        .set_default("pipeline.skip_is_success", false)
}
