//! Failure classification for backend calls
//!
//! Every failed call is reduced to one [`CallsumError::Api`] carrying a
//! user-facing message. The original failure is logged at debug level and
//! then discarded. Nothing is retried.

use reqwest::{Response, StatusCode};

use crate::api::types::ErrorBody;
use crate::error::CallsumError;

/// Message used when a request was sent but no response arrived
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to the server. Please ensure the backend is running.";

/// Message used for failures that fit no other category
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";

/// Last-resort message for an error response with nothing better to show
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Shape of a failed call, before classification
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A response arrived with an error status
    Status {
        /// HTTP status of the response
        status: StatusCode,
        /// Parsed structured error body, when the body was one
        body: Option<ErrorBody>,
        /// Transport-level description of the failure
        transport_message: String,
    },
    /// The request went out but no response came back
    NoResponse,
    /// Anything else (request could not be built, body could not be decoded)
    Other,
}

impl Failure {
    /// Build a [`Failure::Status`] from an error response, consuming its body.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        Self::from_status_body(status, &text)
    }

    /// Build a [`Failure::Status`] from a status and raw body text.
    pub fn from_status_body(status: StatusCode, body: &str) -> Self {
        Failure::Status {
            status,
            body: serde_json::from_str::<ErrorBody>(body).ok(),
            transport_message: format!("Request failed with status code {}", status.as_u16()),
        }
    }

    /// Sort a transport error into "no response" or "other".
    pub fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() || error.is_request() {
            Failure::NoResponse
        } else {
            Failure::Other
        }
    }
}

/// Reduce a failure to the single user-facing error value.
///
/// For an error response the body's `error` field wins, then the
/// transport-level message, then [`FALLBACK_MESSAGE`]; empty strings count
/// as absent.
///
/// # Examples
///
/// ```
/// use callsum::api::classify::{classify, Failure, CONNECTIVITY_MESSAGE};
/// use reqwest::StatusCode;
///
/// let err = classify(Failure::from_status_body(
///     StatusCode::BAD_REQUEST,
///     r#"{"error":"X","status_code":400}"#,
/// ));
/// assert_eq!(err.to_string(), "X");
///
/// assert_eq!(classify(Failure::NoResponse).to_string(), CONNECTIVITY_MESSAGE);
/// ```
pub fn classify(failure: Failure) -> CallsumError {
    let message = match failure {
        Failure::Status {
            body,
            transport_message,
            ..
        } => body
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .or_else(|| Some(transport_message).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
        Failure::NoResponse => CONNECTIVITY_MESSAGE.to_string(),
        Failure::Other => UNEXPECTED_MESSAGE.to_string(),
    };
    CallsumError::Api(message)
}

/// Classify a transport error, logging the original first.
pub(crate) fn classify_transport(error: reqwest::Error) -> CallsumError {
    tracing::debug!("Request failed before a response was received: {}", error);
    classify(Failure::from_transport(&error))
}

/// Classify an error response, logging the status first.
pub(crate) async fn classify_response(response: Response) -> CallsumError {
    let status = response.status();
    let path = response.url().path().to_string();
    let failure = Failure::from_response(response).await;
    tracing::debug!("{} returned {}: {:?}", path, status, failure);
    classify(failure)
}
