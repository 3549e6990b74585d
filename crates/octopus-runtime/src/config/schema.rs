//! Configuration schema definitions.
//!
//! # Example Configuration
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "compact"
//! output = "file"
//! file_path = "logs/octopus.log"
//! rotation = "daily"
//!
//! [logging.filters]
//! reqwest = "warn"
//!
//! [limbs.wechat]
//! sync_interval_secs = 1800
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use figment::value::Value;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OctopusConfig {
    /// Logging settings.
    pub logging: LoggingConfig,

    /// Raw per-limb sections, keyed by limb name.
    pub limbs: HashMap<String, Value>,
}

impl OctopusConfig {
    /// Returns the raw section of the named limb.
    pub fn limb(&self, name: &str) -> Option<&Value> {
        self.limbs.get(name)
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level, overridden by `RUST_LOG` when set.
    pub level: LogLevel,

    pub format: LogFormat,

    pub output: LogOutput,

    /// Span lifecycle events to log.
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    pub thread_ids: bool,

    /// Include source file and line.
    pub file_location: bool,

    /// Log file path, used with `output = "file"`.
    pub file_path: Option<PathBuf>,

    /// File rotation policy.
    pub rotation: LogRotation,

    /// Rotated files to keep (0 keeps everything).
    pub max_files: usize,

    /// Per-module levels, e.g. `octopus_adapter_wechat = "debug"`.
    pub filters: HashMap<String, LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
            file_path: None,
            rotation: LogRotation::Never,
            max_files: 5,
            filters: HashMap::new(),
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Needs the `json-log` feature; falls back to `full` without it.
    Json,
}

/// Output destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Log file rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Span events to log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}
