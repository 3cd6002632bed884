//! Update interaction handlers.
//!
//! `PUT /fhir/Patient/{id}` and `PUT /fhir/Observation/{id}`. Update replaces
//! the stored record; it never creates one.
//!
//! # Response
//!
//! - `200 OK` - Resource replaced
//! - `400 Bad Request` - Body `id` differs from the path, or a Patient without a name
//! - `404 Not Found` - No record with that id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use tracing::debug;
use vitalink_fhir::{Observation, Patient, Resource};
use vitalink_persistence::core::{ObservationRepository, PatientRepository};

use super::require_patient_name;
use crate::error::{RestError, RestResult};
use crate::extractors::FhirResource;
use crate::responses::fhir_response;
use crate::state::AppState;

/// A body `id`, when present, must equal the path id.
fn check_id_matches<T: Resource>(resource: &T, path_id: &str) -> RestResult<()> {
    match resource.id() {
        Some(body_id) if body_id != path_id => Err(RestError::bad_request(format!(
            "Resource ID in body ({}) does not match URL ({})",
            body_id, path_id
        ))),
        _ => Ok(()),
    }
}

/// Handler for `PUT /fhir/Patient/{id}`.
pub async fn update_patient_handler<P, O>(
    State(state): State<AppState<P, O>>,
    Path(id): Path<String>,
    FhirResource(patient): FhirResource<Patient>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!(id = %id, "Processing update Patient request");
    check_id_matches(&patient, &id)?;
    require_patient_name(&patient)?;

    let updated = state.patients().update_patient(&id, patient).await?;
    fhir_response(StatusCode::OK, &updated)
}

/// Handler for `PUT /fhir/Observation/{id}`.
pub async fn update_observation_handler<P, O>(
    State(state): State<AppState<P, O>>,
    Path(id): Path<String>,
    FhirResource(observation): FhirResource<Observation>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!(id = %id, "Processing update Observation request");
    check_id_matches(&observation, &id)?;

    let updated = state
        .observations()
        .update_observation(&id, observation)
        .await?;
    fhir_response(StatusCode::OK, &updated)
}
