//! Response building for the FHIR REST API.
//!
//! Success bodies are serialized as `application/fhir+json`.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use vitalink_fhir::{Bundle, FHIR_JSON};

use crate::error::RestResult;

/// Serializes a resource with the given status.
pub fn fhir_response<T: Serialize>(status: StatusCode, resource: &T) -> RestResult<Response> {
    let body = serde_json::to_value(resource)?;
    Ok((status, [(header::CONTENT_TYPE, FHIR_JSON)], Json(body)).into_response())
}

/// Wraps search results in a `searchset` Bundle and responds with 200.
pub fn searchset_response<T: Serialize>(resources: &[T]) -> RestResult<Response> {
    let bundle = Bundle::searchset(resources)?;
    fhir_response(StatusCode::OK, &bundle)
}
