//! Main configuration file source: `<base>/config.yml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::Path;

pub const MAIN_FILE: &str = "config.yml";

/// Add the optional main config file from the base directory.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    base_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        File::from(base_dir.join(MAIN_FILE))
            .format(FileFormat::Yaml)
            .required(false),
    ))
}
