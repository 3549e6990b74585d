//! Runtime error types.

use thiserror::Error;

use octopus_core::{DispatchError, LimbError};

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A limb section could not be deserialized into the limb's type.
    #[error("Failed to deserialize config for limb '{name}': {message}")]
    LimbConfig { name: String, message: String },

    /// Login, start or construction of the limb failed.
    #[error("Limb error: {0}")]
    Limb(#[from] LimbError),

    /// An outbound event could not be delivered.
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// No limb is attached to the runtime.
    #[error("No limb is running")]
    NotRunning,

    /// `run` was called while a limb is attached.
    #[error("A limb is already running")]
    AlreadyRunning,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
