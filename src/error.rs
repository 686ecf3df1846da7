//! Error types for CallSum
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.
//!
//! Network failures never leave the API client as transport errors: they are
//! classified into [`CallsumError::Api`], whose display string is the
//! user-facing message and nothing else.

use thiserror::Error;

/// Main error type for CallSum operations
///
/// This enum covers configuration loading, pre-network validation, the
/// normalized API failure, session handling, and local I/O.
#[derive(Error, Debug)]
pub enum CallsumError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected locally before any network call was issued
    ///
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    Validation(String),

    /// Normalized backend failure carrying only a user-facing message
    #[error("{0}")]
    Api(String),

    /// Session acquisition or persistence errors
    #[error("Session error: {0}")]
    Session(String),

    /// A protected screen was reached without a session
    #[error("Not signed in. Redirecting to {0}")]
    NotAuthenticated(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl CallsumError {
    /// Returns the message a view should render for this error.
    ///
    /// For [`CallsumError::Api`] and [`CallsumError::Validation`] this is the
    /// bare message; other variants use their full display form.
    pub fn user_message(&self) -> String {
        match self {
            CallsumError::Api(message) | CallsumError::Validation(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for CallSum operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

/// Extracts the user-facing message from any error raised by the crate.
///
/// Views call this at the catch site and store the returned string in their
/// local state. Errors that are not [`CallsumError`] values fall back to
/// their display form.
pub fn user_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<CallsumError>() {
        Some(err) => err.user_message(),
        None => error.to_string(),
    }
}
