//! Create interaction handlers.
//!
//! `POST /fhir/Patient` and `POST /fhir/Observation`. The server assigns the id.
//!
//! # Response
//!
//! - `201 Created` - Resource created, body is the stored resource
//! - `400 Bad Request` - Invalid JSON, wrong `resourceType`, or a Patient without a name
//! - `415 Unsupported Media Type` - Non-JSON body

use axum::{extract::State, http::StatusCode, response::Response};
use tracing::debug;
use vitalink_fhir::{Observation, Patient};
use vitalink_persistence::core::{ObservationRepository, PatientRepository};

use super::require_patient_name;
use crate::error::RestResult;
use crate::extractors::FhirResource;
use crate::responses::fhir_response;
use crate::state::AppState;

/// Handler for `POST /fhir/Patient`.
///
/// # Example
///
/// ```http
/// POST /fhir/Patient HTTP/1.1
/// Content-Type: application/fhir+json
///
/// {"resourceType": "Patient", "name": [{"family": "Smith", "given": ["John"]}]}
/// ```
pub async fn create_patient_handler<P, O>(
    State(state): State<AppState<P, O>>,
    FhirResource(patient): FhirResource<Patient>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!("Processing create Patient request");
    require_patient_name(&patient)?;

    let created = state.patients().create_patient(patient).await?;
    fhir_response(StatusCode::CREATED, &created)
}

/// Handler for `POST /fhir/Observation`.
pub async fn create_observation_handler<P, O>(
    State(state): State<AppState<P, O>>,
    FhirResource(observation): FhirResource<Observation>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!("Processing create Observation request");

    let created = state.observations().create_observation(observation).await?;
    fhir_response(StatusCode::CREATED, &created)
}
