//! Error type for command handlers and the services they call.

use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::PasswordError;
use crate::lock::LockError;
use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Payload or parameter decode failed.
    #[error("invalid request: {0}")]
    DecodeFailed(String),
    /// A request field violates its constraints.
    #[error("{0}")]
    Validation(String),
    /// Guard rejected the command (required input missing).
    #[error("missing required fields for {0}")]
    GuardRejected(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
    /// Uniqueness violation.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] ModelError),
    #[error(transparent)]
    Lock(#[from] LockError),
    /// Credential hashing or token signing failed.
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        HandlerError::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::Validation(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Forbidden(_) => 403,
            HandlerError::NotFound { .. } => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::Store(ModelError::ConcurrencyConflict { .. }) => 409,
            HandlerError::Store(_) => 500,
            HandlerError::Lock(_) => 500,
            HandlerError::Internal(_) => 500,
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<PasswordError> for HandlerError {
    fn from(err: PasswordError) -> Self {
        HandlerError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl From<ValidationErrors> for HandlerError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid ({})", field, e.code),
                })
            })
            .collect();
        messages.sort();
        HandlerError::Validation(messages.join("; "))
    }
}
