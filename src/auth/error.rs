//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The event is not valid in the current state
    #[error("Invalid auth transition: {event} while {from}")]
    InvalidTransition { from: String, event: String },

    /// No bearer token was presented
    #[error("Missing bearer token")]
    MissingToken,

    /// The identity provider refused the token
    #[error("Token rejected: {0}")]
    Rejected(String),

    #[error("Identity provider timeout")]
    Timeout,

    #[error("Identity provider unavailable")]
    Unavailable,

    #[error("Identity provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
}

pub type AuthResult<T> = Result<T, AuthError>;
