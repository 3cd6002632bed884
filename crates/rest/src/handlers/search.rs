//! Search interaction handlers.
//!
//! `GET /fhir/Patient?params` and `GET /fhir/Observation?params`.
//!
//! The raw query string is parsed into structured parameters. Requests with
//! no filter or sort fall back to a plain paged listing. Results are returned
//! as a `searchset` Bundle whose `total` is the number of entries.

use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use tracing::debug;
use vitalink_persistence::core::{ObservationRepository, PatientRepository};
use vitalink_persistence::types::{ObservationSearchParams, PatientSearchParams};

use crate::error::RestResult;
use crate::responses::searchset_response;
use crate::state::AppState;

/// Handler for `GET /fhir/Patient`.
///
/// # Example
///
/// ```http
/// GET /fhir/Patient?birthdate=ge1990-01-01&_sort=-name&_count=5 HTTP/1.1
/// ```
pub async fn search_patients_handler<P, O>(
    State(state): State<AppState<P, O>>,
    RawQuery(query): RawQuery,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    let params = PatientSearchParams::from_query_string(query.as_deref().unwrap_or_default());
    debug!(
        has_criteria = params.has_criteria(),
        limit = params.limit,
        offset = params.offset,
        "Processing Patient search"
    );

    let patients = if params.has_criteria() {
        state.patients().search_patients(&params).await?
    } else {
        state
            .patients()
            .get_all_patients(params.limit, params.offset)
            .await?
    };

    searchset_response(&patients)
}

/// Handler for `GET /fhir/Observation`.
///
/// A query whose only criterion is `patient` lists that patient's
/// observations directly.
pub async fn search_observations_handler<P, O>(
    State(state): State<AppState<P, O>>,
    RawQuery(query): RawQuery,
) -> RestResult<Response>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    let params = ObservationSearchParams::from_query_string(query.as_deref().unwrap_or_default());
    debug!(
        patient = ?params.patient_id,
        has_criteria = params.has_criteria(),
        limit = params.limit,
        offset = params.offset,
        "Processing Observation search"
    );

    let service = state.observations();
    let observations = match params.patient_id.as_deref() {
        Some(patient_id) if params.is_patient_only() => {
            service
                .get_observations_by_patient_id(patient_id, params.limit, params.offset)
                .await?
        }
        _ if params.has_criteria() => service.search_observations(&params).await?,
        _ => {
            service
                .get_all_observations(params.limit, params.offset)
                .await?
        }
    };

    searchset_response(&observations)
}
