//! Unified error types for Octopus limbs.
//!
//! Inbound processing degrades instead of failing, so most of these errors
//! only surface on the outbound path or in logs.

use thiserror::Error;

use crate::event::EventKind;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors raised while retrieving or decoding remote attachments.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),

    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Status code returned by the remote.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The remote returned zero bytes.
    #[error("file must be non-empty")]
    EmptyBody,

    /// The body could not be read or decompressed.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// =============================================================================
// Session Errors
// =============================================================================

/// Errors reported by the chat-client session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The session has not been authenticated.
    #[error("session is not logged in")]
    NotLoggedIn,

    /// A directory entry could not be found.
    #[error("{0} not found")]
    NotFound(String),

    /// The underlying request failed.
    #[error("session request failed: {0}")]
    Request(String),

    /// The provider rejected the call.
    #[error("provider error ({code}): {message}")]
    Protocol {
        /// Provider return code.
        code: i64,
        /// Provider message.
        message: String,
    },
}

// =============================================================================
// Dispatch Errors
// =============================================================================

/// Errors returned when delivering an outbound event.
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// The target chat is not in the session directory.
    #[error("chat {0} not found")]
    ChatNotFound(String),

    /// The event kind cannot be sent.
    #[error("event type not support: {0}")]
    Unsupported(EventKind),

    /// The event kind needs an attachment the event does not carry.
    #[error("{0} event carries no attachment")]
    MissingData(EventKind),

    /// The send call failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

// =============================================================================
// Limb Errors
// =============================================================================

/// Errors raised by limb lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum LimbError {
    /// The session authenticated but reported no account id.
    #[error("failed to get self id")]
    MissingSelfId,

    /// An operation needs a logged-in limb.
    #[error("limb is not logged in")]
    NotLoggedIn,

    /// `start` was called twice.
    #[error("limb is already running")]
    AlreadyStarted,

    /// The limb configuration is unusable.
    #[error("invalid limb configuration: {0}")]
    InvalidConfig(String),

    /// The attachment client could not be created.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Session failure during a lifecycle call.
    #[error(transparent)]
    Session(#[from] SessionError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for outbound dispatch.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Result type for limb lifecycle operations.
pub type LimbResult<T> = Result<T, LimbError>;
