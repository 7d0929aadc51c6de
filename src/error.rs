//! Error types for inspector-bridge.

use thiserror::Error;

use crate::context::ContextId;

/// Main error type for inspector-bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// No inspector session is attached to the context.
    #[error("no inspector session for context {0}")]
    NoSession(ContextId),

    /// An inspector session is already attached to the context.
    #[error("inspector session already exists for context {0}")]
    SessionExists(ContextId),

    /// The context a dispatcher was bound to has been dropped.
    #[error("context has been dropped")]
    ContextDropped,

    /// A host callback raised a script error.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The engine answered a request with a protocol error.
    #[error("protocol error {code}: {message}{}", detail(.data))]
    Protocol {
        code: i64,
        message: String,
        data: Option<String>,
    },

    /// The command is not part of the attached protocol schema.
    #[error("unknown or experimental command: {0}")]
    UnknownCommand(String),

    /// The engine did not answer a request synchronously.
    #[error("no response to {0}")]
    NoResponse(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn detail(data: &Option<String>) -> String {
    data.as_ref().map(|d| format!(": {}", d)).unwrap_or_default()
}

/// Convenience Result type for inspector-bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// An exception raised by host script while handling a callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("uncaught script error: {message}")]
pub struct ScriptError {
    message: String,
}

impl ScriptError {
    /// Create a script error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Script execution was attempted where the context forbids it.
    pub fn forbidden() -> Self {
        Self::new("script execution forbidden")
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
