//! Application state for the Vitalink REST API.
//!
//! Holds the two services. Handlers receive a clone per request; the
//! repositories inside are behind an `Arc`.

use std::sync::Arc;

use vitalink_persistence::core::{ObservationRepository, PatientRepository};

use crate::services::{ObservationService, PatientService};

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `P` - The Patient repository
/// * `O` - The Observation repository
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use vitalink_rest::AppState;
///
/// let state = AppState::new(Arc::new(patients), Arc::new(observations));
/// ```
pub struct AppState<P, O> {
    patients: PatientService<P>,
    observations: ObservationService<O>,
}

// Manual Clone: the repositories themselves need not be Clone
impl<P, O> Clone for AppState<P, O> {
    fn clone(&self) -> Self {
        Self {
            patients: self.patients.clone(),
            observations: self.observations.clone(),
        }
    }
}

impl<P, O> AppState<P, O>
where
    P: PatientRepository,
    O: ObservationRepository,
{
    /// Creates a new AppState over the given repositories.
    pub fn new(patients: Arc<P>, observations: Arc<O>) -> Self {
        Self {
            patients: PatientService::new(patients),
            observations: ObservationService::new(observations),
        }
    }

    /// Returns the Patient service.
    pub fn patients(&self) -> &PatientService<P> {
        &self.patients
    }

    /// Returns the Observation service.
    pub fn observations(&self) -> &ObservationService<O> {
        &self.observations
    }
}
