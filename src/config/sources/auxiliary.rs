//! Auxiliary YAML files kept as opaque values: tasks, triggers, secrets.

use crate::error::PipelineError;
use serde_yaml::{Mapping, Value};
use std::path::Path;

pub const TASKS_FILE: &str = "tasks.yml";
pub const TRIGGERS_FILE: &str = "triggers.yml";
pub const SECRETS_FILE: &str = "secrets.yml";

pub fn empty_mapping() -> Value {
    Value::Mapping(Mapping::new())
}

/// Load `<base>/<name>`; a missing or empty file yields an empty mapping.
pub fn load(base_dir: &Path, name: &str) -> Result<Value, PipelineError> {
    let path = base_dir.join(name);
    if !path.exists() {
        return Ok(empty_mapping());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| PipelineError::io(&path, e))?;
    let value: Value = serde_yaml::from_str(&content).map_err(|e| {
        PipelineError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;
    Ok(match value {
        Value::Null => empty_mapping(),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_is_empty_mapping() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(TRIGGERS_FILE), "").unwrap();
        let value = load(temp.path(), TRIGGERS_FILE).unwrap();
        assert_eq!(value, empty_mapping());
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SECRETS_FILE), "key: [oops\n").unwrap();
        let err = load(temp.path(), SECRETS_FILE).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
