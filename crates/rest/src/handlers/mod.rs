//! HTTP request handlers, one module per interaction.
//!
//! - [`create`] - `POST /fhir/{type}`
//! - [`read`] - `GET /fhir/{type}/{id}`
//! - [`update`] - `PUT /fhir/{type}/{id}`
//! - [`delete`] - `DELETE /fhir/{type}/{id}`
//! - [`search`] - `GET /fhir/{type}?params`
//!
//! Every handler is generic over the Patient repository `P` and the
//! Observation repository `O` held in [`AppState`](crate::state::AppState).

pub mod create;
pub mod delete;
pub mod read;
pub mod search;
pub mod update;

pub use create::{create_observation_handler, create_patient_handler};
pub use delete::{delete_observation_handler, delete_patient_handler};
pub use read::{read_observation_handler, read_patient_handler};
pub use search::{search_observations_handler, search_patients_handler};
pub use update::{update_observation_handler, update_patient_handler};

use crate::error::RestError;

/// Rejects Patient bodies without a usable name.
pub(crate) fn require_patient_name(patient: &vitalink_fhir::Patient) -> Result<(), RestError> {
    if patient.has_usable_name() {
        Ok(())
    } else {
        Err(RestError::bad_request(
            "Patient must have at least one name with a family or given part",
        ))
    }
}
