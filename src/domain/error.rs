use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single failed attempt. Retried by the use case and never returned
    /// to callers of `ask`.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Service unavailable after {attempts} attempts: {last_error}")]
    Unavailable { attempts: u32, last_error: String },

    #[error("Request cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Caller-facing classification of a failed `ask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidInput,
    Transport,
    MalformedResponse,
    Unavailable,
    Cancelled,
    Configuration,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::Transport => "transport",
            FailureKind::MalformedResponse => "malformed_response",
            FailureKind::Unavailable => "unavailable",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Configuration => "configuration",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn unavailable(attempts: u32, last_error: impl Into<String>) -> Self {
        Self::Unavailable {
            attempts,
            last_error: last_error.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput(_) => FailureKind::InvalidInput,
            Self::Transport(_) => FailureKind::Transport,
            Self::MalformedResponse(_) => FailureKind::MalformedResponse,
            Self::Unavailable { .. } => FailureKind::Unavailable,
            Self::Cancelled => FailureKind::Cancelled,
            Self::Configuration(_) => FailureKind::Configuration,
        }
    }

    /// Only transport failures (network errors, non-2xx statuses) are worth
    /// another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
