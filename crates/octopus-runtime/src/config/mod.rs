//! Configuration module for the Octopus runtime.
//!
//! Configuration is layered with figment: built-in defaults, config files,
//! `OCTOPUS_*` environment variables and programmatic overrides. Each limb
//! owns a section under `limbs` that it deserializes into its own type.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig, OctopusConfig, SpanEventConfig,
};
