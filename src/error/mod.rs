//! Error types and HTTP response handling.
//!
//! `AppError` is the top-level error for every operation that can fail as a whole:
//! configuration, persistence, Discord calls made outside of item-level processing,
//! missing guilds or templates, and the confirmation gate. Item-level failures inside a
//! snapshot or apply run never surface here; they are tallied in the run's report.

pub mod config;
pub mod graph;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dioxus_logger::tracing;
use thiserror::Error;

use crate::{
    error::{config::ConfigError, graph::ReadError},
    model::api::ErrorDto,
};

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Template store operation error from SeaORM.
    ///
    /// Fails the whole snapshot or apply call. Not retried.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// The source guild could not be walked at all.
    ///
    /// Raised only when a top-level listing fails. Unreadable individual items are
    /// skipped instead.
    #[error(transparent)]
    CollectionFailure(#[from] ReadError),

    /// Missing guild or template.
    ///
    /// Always raised before any mutating call has been issued.
    #[error("{0}")]
    NotFound(String),

    /// Malformed command or request, e.g. a guild ID that does not parse.
    #[error("{0}")]
    BadRequest(String),

    /// Caller lacks the permission required for the operation.
    #[error("{0}")]
    Forbidden(String),

    /// The confirmation window elapsed without a confirmation.
    ///
    /// No mutating call has been issued.
    #[error("No confirmation received within {seconds} seconds")]
    ConfirmationTimeout {
        /// Length of the window that elapsed
        seconds: u64,
    },

    /// The confirmation source ended without confirming.
    #[error("Operation was not confirmed")]
    ConfirmationDeclined,

    /// I/O error, e.g. binding the health listener.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Internal error with custom message.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Message safe to show to a Discord user.
    ///
    /// Errors caused by the caller are shown as-is. Everything else is reduced to a
    /// generic message since the details are logged.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(_)
            | Self::Forbidden(_)
            | Self::NotFound(_)
            | Self::CollectionFailure(_)
            | Self::ConfirmationTimeout { .. }
            | Self::ConfirmationDeclined => self.to_string(),
            _ => "Something went wrong, check the bot logs for details".to_string(),
        }
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 404 Not Found - For `NotFound` variant
/// - 500 Internal Server Error - For all other error types, with details logged server-side
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorDto { error: msg })).into_response()
            }
            Self::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, Json(ErrorDto { error: msg })).into_response()
            }
            Self::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(ErrorDto { error: msg })).into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}
