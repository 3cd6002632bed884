//! Error types for the REST API.
//!
//! Every error leaves the server as a FHIR OperationOutcome.
//!
//! # Error Mapping
//!
//! Storage errors from the persistence layer are mapped to HTTP status codes
//! and FHIR issue codes:
//!
//! | Storage Error | HTTP Status | FHIR Issue Code |
//! |--------------|-------------|-----------------|
//! | NotFound | 404 | not-found |
//! | ValidationError | 400 | invalid |
//! | BackendError | 500 | exception |

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::fmt;
use vitalink_persistence::error::{ResourceError, StorageError, ValidationError};

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Resource not found (HTTP 404).
    NotFound {
        /// The resource type (e.g., "Patient").
        resource_type: String,
        /// The resource ID.
        id: String,
    },

    /// Bad request - validation error (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Shorthand for a [`RestError::BadRequest`].
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { resource_type, id } => {
                write!(f, "Resource not found: {}/{}", resource_type, id)
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, details) = match &self {
            RestError::NotFound { resource_type, id } => (
                "not-found",
                format!("Resource {}/{} not found", resource_type, id),
            ),
            RestError::BadRequest { message } => ("invalid", message.clone()),
            RestError::UnsupportedMediaType { content_type } => (
                "not-supported",
                format!("Content type '{}' is not supported", content_type),
            ),
            RestError::InternalError { message } => {
                tracing::error!(error = %message, "Request failed");
                ("exception", message.clone())
            }
        };

        let operation_outcome = create_operation_outcome("error", code, &details);
        (
            status,
            [(header::CONTENT_TYPE, vitalink_fhir::FHIR_JSON)],
            Json(operation_outcome),
        )
            .into_response()
    }
}

/// Creates a FHIR OperationOutcome resource.
///
/// # Arguments
///
/// * `severity` - The issue severity (fatal, error, warning, information)
/// * `code` - The FHIR issue code
/// * `details` - Human-readable details
pub fn create_operation_outcome(severity: &str, code: &str, details: &str) -> serde_json::Value {
    serde_json::json!({
        "resourceType": "OperationOutcome",
        "issue": [{
            "severity": severity,
            "code": code,
            "details": {
                "text": details
            }
        }]
    })
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => RestError::InternalError {
                message: e.to_string(),
            },
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { resource_type, id } => {
                RestError::NotFound { resource_type, id }
            }
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidResource { message } => RestError::BadRequest { message },
            ValidationError::InvalidSearchParameter { parameter, message } => {
                RestError::BadRequest {
                    message: format!("Invalid search parameter '{}': {}", parameter, message),
                }
            }
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::InternalError {
            message: format!("Failed to serialize response: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use vitalink_persistence::error::BackendError;

    #[test]
    fn test_not_found_mapping() {
        let err: RestError = StorageError::not_found("Patient", "123").into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Resource not found: Patient/123");
    }

    #[test]
    fn test_validation_mapping() {
        let err: RestError = StorageError::Validation(ValidationError::InvalidSearchParameter {
            parameter: "_count".to_string(),
            message: "must be positive".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("_count"));
    }

    #[test]
    fn test_backend_mapping() {
        let err: RestError = StorageError::Backend(BackendError::QueryError {
            message: "invalid observation ID: xyz".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_operation_outcome_shape() {
        let outcome = create_operation_outcome("error", "not-found", "Resource Patient/1 not found");
        assert_eq!(outcome["resourceType"], "OperationOutcome");
        assert_eq!(outcome["issue"][0]["severity"], "error");
        assert_eq!(outcome["issue"][0]["code"], "not-found");
        assert_eq!(
            outcome["issue"][0]["details"]["text"],
            "Resource Patient/1 not found"
        );
    }

    #[test]
    fn test_unsupported_media_type_status() {
        let response = RestError::UnsupportedMediaType {
            content_type: "text/plain".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            vitalink_fhir::FHIR_JSON
        );
    }
}
