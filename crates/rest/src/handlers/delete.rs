//! Delete interaction handlers.
//!
//! `DELETE /fhir/Patient/{id}` and `DELETE /fhir/Observation/{id}`.
//! Returns `204 No Content`, or `404 Not Found` when nothing was deleted.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;
use vitalink_persistence::core::{ObservationRepository, PatientRepository};

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for `DELETE /fhir/Patient/{id}`.
pub async fn delete_patient_handler<P, O>(
    State(state): State<AppState<P, O>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!(id = %id, "Processing delete Patient request");

    state.patients().delete_patient(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Handler for `DELETE /fhir/Observation/{id}`.
pub async fn delete_observation_handler<P, O>(
    State(state): State<AppState<P, O>>,
    Path(id): Path<String>,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    debug!(id = %id, "Processing delete Observation request");

    state.observations().delete_observation(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
