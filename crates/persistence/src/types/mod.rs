//! Domain records and search parameter types.

mod observation;
mod patient;
mod search_params;

pub use observation::{Observation, ObservationComponent, ObservationStatus, ObservationValue};
pub use patient::{AdministrativeGender, Patient};
pub use search_params::{
    DEFAULT_LIMIT, MAX_LIMIT, ObservationSearchParams, PatientSearchParams, SortOrder,
    effective_sort_order,
};
