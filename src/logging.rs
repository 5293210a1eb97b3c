//! Logging System
//!
//! Structured logging implementation using the `tracing` crate. Provides configurable
//! log levels, output formats, and destinations.
//!
//! The subscriber is built into a [`LoggingContext`] owned by the caller rather than installed
//! as the process-wide default; a run executes inside [`LoggingContext::in_scope`].

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

/// Log file name used when neither CLI, environment nor config names one.
pub const DEFAULT_LOG_FILE: &str = "hb_processing.log";

/// Resolve the log file path with precedence: CLI, HB_LOG_FILE env, config file, default.
///
/// Relative paths are taken relative to the base directory.
pub fn resolve_log_file_path(
    cli_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    base_dir: &Path,
) -> PathBuf {
    let chosen = cli_file
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| {
            std::env::var("HB_LOG_FILE")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| config_file.filter(|p| !p.as_os_str().is_empty()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    if chosen.is_absolute() {
        chosen
    } else {
        base_dir.join(chosen)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off (case-insensitive)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; relative to the base directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "file+stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Command-line logging flags; each one beats environment and config.
#[derive(Debug, Clone, Default)]
pub struct LoggingOverrides {
    pub level: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
    pub file: Option<PathBuf>,
}

/// A built subscriber plus where it writes.
pub struct LoggingContext {
    dispatch: Dispatch,
    log_file: Option<PathBuf>,
}

impl LoggingContext {
    /// Build the logging context.
    ///
    /// Priority order (highest to lowest):
    /// 1. CLI arguments
    /// 2. Environment variables (HB_LOG, HB_LOG_FORMAT, HB_LOG_OUTPUT, HB_LOG_FILE)
    /// 3. Configuration file
    /// 4. Defaults
    pub fn build(
        config: &LoggingConfig,
        overrides: &LoggingOverrides,
        base_dir: &Path,
    ) -> Result<Self, PipelineError> {
        if !config.enabled {
            return Ok(Self::disabled());
        }

        let filter = build_env_filter(config, overrides.level.as_deref())?;
        let format = determine_format(config, overrides.format.as_deref())?;
        let output = determine_output(config, overrides.output.as_deref())?;

        let log_file = if output.file {
            Some(resolve_log_file_path(
                overrides.file.clone(),
                config.file.clone(),
                base_dir,
            ))
        } else {
            None
        };

        let writer = match &log_file {
            Some(path) => {
                let file = open_log_file(path)?;
                if output.stderr {
                    BoxMakeWriter::new(file.and(std::io::stderr))
                } else {
                    BoxMakeWriter::new(file)
                }
            }
            None if output.stdout && output.stderr => {
                BoxMakeWriter::new(std::io::stdout.and(std::io::stderr))
            }
            None if output.stderr => BoxMakeWriter::new(std::io::stderr),
            None => BoxMakeWriter::new(std::io::stdout),
        };

        let use_ansi = config.color && log_file.is_none();
        let layer = if format == "json" {
            fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(writer)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(use_ansi)
                .with_writer(writer)
                .boxed()
        };

        let subscriber = Registry::default().with(filter).with(layer);
        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            log_file,
        })
    }

    /// A context that drops every event.
    pub fn disabled() -> Self {
        let subscriber = Registry::default()
            .with(EnvFilter::new("off"))
            .with(fmt::layer().with_writer(std::io::sink));
        Self {
            dispatch: Dispatch::new(subscriber),
            log_file: None,
        }
    }

    /// Run `f` with this context as the current default subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

fn open_log_file(path: &Path) -> Result<std::fs::File, PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::Logging(format!("Failed to create log directory: {}", e))
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            PipelineError::Logging(format!("Failed to open log file {:?}: {}", path, e))
        })
}

/// Build environment filter from CLI, environment variables or config
fn build_env_filter(
    config: &LoggingConfig,
    cli_level: Option<&str>,
) -> Result<EnvFilter, PipelineError> {
    let level = match cli_level {
        Some(level) => level.to_ascii_lowercase(),
        None => {
            if let Ok(filter) = EnvFilter::try_from_env("HB_LOG") {
                return Ok(filter);
            }
            config.level.to_ascii_lowercase()
        }
    };

    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(&level)
        .map_err(|e| PipelineError::Logging(format!("Invalid log level {}: {}", level, e)))?;

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level.to_ascii_lowercase());
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| PipelineError::Logging(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Determine output format from CLI, environment or config
fn determine_format(
    config: &LoggingConfig,
    cli_format: Option<&str>,
) -> Result<String, PipelineError> {
    let format = match cli_format {
        Some(format) => format.to_string(),
        None => match std::env::var("HB_LOG_FORMAT") {
            Ok(format) if format == "json" || format == "text" => format,
            _ => config.format.clone(),
        },
    };

    if format != "json" && format != "text" {
        return Err(PipelineError::Logging(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }

    Ok(format)
}

/// Output destinations
#[derive(Debug)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Determine output destinations from CLI, environment or config
fn determine_output(
    config: &LoggingConfig,
    cli_output: Option<&str>,
) -> Result<OutputDestinations, PipelineError> {
    if let Some(output) = cli_output {
        return parse_output_destinations(output);
    }
    if let Ok(output) = std::env::var("HB_LOG_OUTPUT") {
        return parse_output_destinations(&output);
    }
    parse_output_destinations(&config.output)
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, PipelineError> {
    match output {
        "stdout" => Ok(OutputDestinations {
            stdout: true,
            stderr: false,
            file: false,
        }),
        "stderr" => Ok(OutputDestinations {
            stdout: false,
            stderr: true,
            file: false,
        }),
        "file" => Ok(OutputDestinations {
            stdout: false,
            stderr: false,
            file: true,
        }),
        "file+stderr" => Ok(OutputDestinations {
            stdout: false,
            stderr: true,
            file: true,
        }),
        "both" => Ok(OutputDestinations {
            stdout: true,
            stderr: true,
            file: false,
        }),
        _ => Err(PipelineError::Logging(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
            output
        ))),
    }
}
