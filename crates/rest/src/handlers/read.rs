//! Read interaction handlers.
//!
//! `GET /fhir/Patient/{id}` and `GET /fhir/Observation/{id}`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
};
use tracing::debug;
use vitalink_persistence::core::{ObservationRepository, PatientRepository};

use crate::error::RestResult;
use crate::responses::fhir_response;
use crate::state::AppState;

/// Handler for `GET /fhir/Patient/{id}`.
///
/// Returns `200 OK` with the resource or `404 Not Found`.
pub async fn read_patient_handler<P, O>(
    State(state): State<AppState<P, O>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!(id = %id, "Processing read Patient request");

    let patient = state.patients().get_patient(&id).await?;
    fhir_response(StatusCode::OK, &patient)
}

/// Handler for `GET /fhir/Observation/{id}`.
///
/// A malformed id is a storage error (500), not a 404.
pub async fn read_observation_handler<P, O>(
    State(state): State<AppState<P, O>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!(id = %id, "Processing read Observation request");

    let observation = state.observations().get_observation(&id).await?;
    fhir_response(StatusCode::OK, &observation)
}
