//! Core error types for the Rentora tenant-selection client.
//!
//! This module defines transport-agnostic error types. HTTP-specific failures
//! (from reqwest) are converted into these types by the API client layer so
//! callers branch on structure, never on a transport exception.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tenant-selection client.
#[derive(Error, Debug)]
pub enum Error {
    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// HTTP status code associated with this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(api) => api.status(),
            _ => None,
        }
    }

    /// Returns true if this error represents a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Api(api) if api.is_timeout())
    }
}

/// Structured failure returned by the API boundary.
///
/// Every async operation converts its failure into this shape rather than
/// letting a transport error escape. Timeouts are a distinct variant so the
/// view layer can offer a differentiated retry affordance.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request timed out (transport timeout or HTTP 408).
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not reach the server.
    #[error("network error: {0}")]
    Network(String),

    /// The server rejected the request with a non-2xx status.
    /// `message` carries the server's detail message verbatim.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Timeout(_) => Some(408),
            _ => None,
        }
    }

    /// Returns true for transport timeouts and HTTP 408 responses.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout(_))
    }

    /// The human-readable message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Timeout(m) | ApiError::Network(m) | ApiError::Decode(m) => m,
            ApiError::Server { message, .. } => message,
        }
    }
}

/// Validation errors for payloads crossing the API boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Record is missing a non-empty identifier")]
    MissingIdentifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_render_the_offending_detail() {
        let err = Error::Validation(ValidationError::MissingField("propertyId".to_string()));
        assert_eq!(
            err.to_string(),
            "Input validation failed: Required field 'propertyId' is missing"
        );
        assert_eq!(err.status(), None);

        assert_eq!(
            ValidationError::MissingIdentifier.to_string(),
            "Record is missing a non-empty identifier"
        );
    }

    #[test]
    fn test_timeout_is_distinguished() {
        let err = Error::Api(ApiError::Timeout("deadline exceeded".to_string()));
        assert!(err.is_timeout());
        assert_eq!(err.status(), Some(408));

        let err = Error::Api(ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(!err.is_timeout());
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ApiError::Server {
            status: 404,
            message: "Lead not found".to_string(),
        };
        assert_eq!(err.message(), "Lead not found");
    }
}
