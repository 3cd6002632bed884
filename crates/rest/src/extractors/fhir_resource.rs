//! FHIR resource extractor.
//!
//! Decodes a typed wire resource from the request body and checks that its
//! `resourceType` matches the route.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use vitalink_fhir::Resource;

use crate::error::RestError;

/// Axum extractor for a typed FHIR resource.
///
/// A missing `Content-Type` is treated as JSON. A body without
/// `resourceType` decodes with the type's default.
///
/// # Example
///
/// ```rust,ignore
/// use vitalink_fhir::Patient;
/// use vitalink_rest::extractors::FhirResource;
///
/// async fn create_handler(FhirResource(patient): FhirResource<Patient>) {
///     println!("{:?}", patient.name);
/// }
/// ```
#[derive(Debug)]
pub struct FhirResource<T>(pub T);

impl<T> FhirResource<T> {
    /// Consumes the extractor and returns the resource.
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Error type for FHIR resource extraction failures.
#[derive(Debug, Error)]
pub enum FhirResourceRejection {
    /// The body could not be read or is not valid JSON for the resource.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Unsupported content type.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The body is a different resource than the route expects.
    #[error("Expected resourceType '{expected}', found '{found}'")]
    ResourceTypeMismatch {
        /// Type the route accepts.
        expected: &'static str,
        /// Type found in the body.
        found: String,
    },
}

impl IntoResponse for FhirResourceRejection {
    fn into_response(self) -> Response {
        let error = match self {
            FhirResourceRejection::UnsupportedMediaType(ct) => {
                RestError::UnsupportedMediaType { content_type: ct }
            }
            other => RestError::bad_request(other.to_string()),
        };
        error.into_response()
    }
}

impl<S, T> FromRequest<S> for FhirResource<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Resource,
{
    type Rejection = FhirResourceRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Own the header before the request is consumed
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        if !content_type.contains("json") {
            return Err(FhirResourceRejection::UnsupportedMediaType(content_type));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| FhirResourceRejection::InvalidJson(e.to_string()))?;

        let resource: T = serde_json::from_slice(&bytes)
            .map_err(|e| FhirResourceRejection::InvalidJson(e.to_string()))?;

        if resource.resource_type() != T::RESOURCE_TYPE {
            return Err(FhirResourceRejection::ResourceTypeMismatch {
                expected: T::RESOURCE_TYPE,
                found: resource.resource_type().to_string(),
            });
        }

        Ok(FhirResource(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use vitalink_fhir::Patient;

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = Request::builder().method("POST").uri("/fhir/Patient");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn extract(req: Request) -> Result<FhirResource<Patient>, FhirResourceRejection> {
        FhirResource::<Patient>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_extracts_patient() {
        let req = request(
            Some("application/fhir+json"),
            r#"{"resourceType":"Patient","name":[{"family":"Smith"}]}"#,
        );
        let patient = extract(req).await.unwrap().into_inner();
        assert!(patient.has_usable_name());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_json() {
        let req = request(None, r#"{"active":true}"#);
        let patient = extract(req).await.unwrap().into_inner();
        assert_eq!(patient.active, Some(true));
    }

    #[tokio::test]
    async fn test_rejects_non_json_content_type() {
        let req = request(Some("application/fhir+xml"), "<Patient/>");
        let rejection = extract(req).await.unwrap_err();
        assert!(matches!(
            rejection,
            FhirResourceRejection::UnsupportedMediaType(_)
        ));
        assert_eq!(
            rejection.into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[tokio::test]
    async fn test_rejects_invalid_json() {
        let req = request(Some("application/json"), "{not json");
        let rejection = extract(req).await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rejects_wrong_resource_type() {
        let req = request(Some("application/json"), r#"{"resourceType":"Observation"}"#);
        let rejection = extract(req).await.unwrap_err();
        assert!(rejection.to_string().contains("Observation"));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
