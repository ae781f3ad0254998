use crate::domain::validation::ValidationError;
use std::fmt;

// Failure of one backend call, kept free of the HTTP client's types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Transport(String),
    Upstream {
        status: u16,
        message: Option<String>,
    },
    Decode(String),
}

impl ApiError {
    /// Message the backend supplied with a non-success response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Upstream {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// What the user sees: the server's words when present, else the
    /// operation's own fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "backend transport error: {err}"),
            ApiError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "backend error {status}: {message}")
                } else {
                    write!(f, "backend error {status}")
                }
            }
            ApiError::Decode(err) => write!(f, "backend response decode error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

// Outcome of a rejected orchestrator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    // Local check failed; nothing was sent.
    Invalid(ValidationError),
    // The backend call failed; carries the user-facing message.
    Remote(String),
    // The same action is already in flight.
    Busy,
    // A step was attempted before the one it depends on succeeded.
    OutOfOrder,
}

impl ActionError {
    pub fn remote(err: &ApiError, fallback: &str) -> Self {
        ActionError::Remote(err.user_message(fallback))
    }

    pub fn message(&self) -> String {
        match self {
            ActionError::Invalid(err) => err.message().to_string(),
            ActionError::Remote(message) => message.clone(),
            ActionError::Busy => "A request is already in progress.".to_string(),
            ActionError::OutOfOrder => "Finish the previous step first.".to_string(),
        }
    }
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        ActionError::Invalid(err)
    }
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ActionError {}
