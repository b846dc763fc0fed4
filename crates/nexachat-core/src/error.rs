//! Shared error type across NexaChat crates.

use thiserror::Error;

/// Error categories (stable API).
///
/// The runner decides how to surface an error from its category alone:
/// validation and state errors become notices, decode errors are only
/// logged, transport errors end the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input rejected locally (empty name, empty message, bad room id).
    Validation,
    /// Inbound frame could not be decoded.
    Decode,
    /// Intent not allowed in the current session state.
    State,
    /// Connection failed, errored or closed.
    Transport,
    /// Invalid configuration.
    Config,
    /// Bug or broken environment.
    Internal,
}

impl ErrorCategory {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Validation => "VALIDATION",
            ErrorCategory::Decode => "DECODE",
            ErrorCategory::State => "STATE",
            ErrorCategory::Transport => "TRANSPORT",
            ErrorCategory::Config => "CONFIG",
            ErrorCategory::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NexaChatError>;

/// Unified error type used by core and client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NexaChatError {
    #[error("Please enter your name")]
    EmptyName,
    #[error("\"{0}\" is reserved")]
    ReservedName(String),
    #[error("name already set to {0}")]
    NameAlreadySet(String),
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("room id must not be empty")]
    EmptyRoomId,
    #[error("room id is not url-safe: {0}")]
    InvalidRoomId(String),
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    #[error("malformed frame: {0}")]
    Decode(String),
    #[error("unknown envelope type: {0}")]
    UnknownKind(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl NexaChatError {
    /// Map an error to its stable category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            NexaChatError::EmptyName
            | NexaChatError::ReservedName(_)
            | NexaChatError::EmptyMessage
            | NexaChatError::EmptyRoomId
            | NexaChatError::InvalidRoomId(_) => ErrorCategory::Validation,
            NexaChatError::NameAlreadySet(_) | NexaChatError::InvalidState { .. } => {
                ErrorCategory::State
            }
            NexaChatError::Decode(_) | NexaChatError::UnknownKind(_) => ErrorCategory::Decode,
            NexaChatError::Transport(_) => ErrorCategory::Transport,
            NexaChatError::Config(_) | NexaChatError::UnsupportedVersion => ErrorCategory::Config,
            NexaChatError::Internal(_) => ErrorCategory::Internal,
        }
    }
}
