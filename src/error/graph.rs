//! Errors raised by the guild graph collaborators.
//!
//! `ReadError` covers the read side used while snapshotting. `WriteError` covers the
//! write side used while applying a template, and classifies failures so the retry
//! policy can tell a rate limit from a request Discord will never accept.

use serenity::http::HttpError;
use std::time::Duration;
use thiserror::Error;

/// A read against the source guild failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to {operation}: {message}")]
pub struct ReadError {
    /// Short description of the read, e.g. "list roles"
    pub operation: String,
    /// Underlying failure message
    pub message: String,
}

impl ReadError {
    pub fn new(operation: impl Into<String>, message: impl ToString) -> Self {
        Self {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Converts a Serenity error raised while performing `operation`.
    pub fn from_serenity(operation: impl Into<String>, err: serenity::Error) -> Self {
        Self::new(operation, err)
    }
}

/// A write against the target guild failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WriteError {
    /// The platform rejected the call with a rate limit.
    ///
    /// Retried with backoff. `retry_after` carries the server hint when one was given.
    #[error("Rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// The platform refused the request (validation, permissions, limits).
    ///
    /// Never retried since repeating the request cannot change the outcome.
    #[error("Rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Network or unexpected failure.
    #[error("Request failed: {0}")]
    Transport(String),
}

impl WriteError {
    /// Whether the retry policy may attempt the call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Server-provided wait before retrying, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Classifies a Serenity error by HTTP status.
    ///
    /// - 429 → `RateLimited`
    /// - other 4xx → `Rejected`
    /// - anything else → `Transport`
    pub fn from_serenity(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            let status = response.status_code.as_u16();
            if status == 429 {
                return Self::RateLimited { retry_after: None };
            }
            if (400..500).contains(&status) {
                return Self::Rejected {
                    status,
                    message: response.error.message.clone(),
                };
            }
        }

        Self::Transport(err.to_string())
    }
}
