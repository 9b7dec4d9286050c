//! Error types for remote requests and local payload validation.

use crate::model::SimMode;
use thiserror::Error;

/// Failure of a single request/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Non-success response. `message` is the server's `error` field when the
    /// body carried one, otherwise `"<status> <reason>"`.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("unexpected response for {path}: {reason}")]
    Decode { path: String, reason: String },
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("select unique teams for this mode")]
    TeamSelection { mode: SimMode, required: usize },
}

/// Anything a user-triggered create can fail with.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
