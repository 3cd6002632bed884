//! Observation use cases.

use std::sync::Arc;

use tracing::debug;
use vitalink_persistence::core::ObservationRepository;
use vitalink_persistence::error::StorageResult;
use vitalink_persistence::types::ObservationSearchParams;

use crate::mapping::{observation_from_wire, observation_to_wire};

/// Observation operations over an [`ObservationRepository`].
pub struct ObservationService<R> {
    repository: Arc<R>,
}

impl<R> Clone for ObservationService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ObservationRepository> ObservationService<R> {
    /// Creates a service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stores a new observation.
    pub async fn create_observation(
        &self,
        resource: vitalink_fhir::Observation,
    ) -> StorageResult<vitalink_fhir::Observation> {
        let created = self
            .repository
            .create(observation_from_wire(&resource))
            .await?;
        debug!(id = %created.id_str(), patient_id = %created.patient_id, "Created observation");
        Ok(observation_to_wire(&created))
    }

    /// Reads one observation.
    pub async fn get_observation(&self, id: &str) -> StorageResult<vitalink_fhir::Observation> {
        let observation = self.repository.get_by_id(id).await?;
        Ok(observation_to_wire(&observation))
    }

    /// Lists the observations recorded for one patient.
    pub async fn get_observations_by_patient_id(
        &self,
        patient_id: &str,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<vitalink_fhir::Observation>> {
        let observations = self
            .repository
            .get_by_patient_id(patient_id, limit, offset)
            .await?;
        Ok(observations.iter().map(observation_to_wire).collect())
    }

    /// Lists observations without filtering.
    pub async fn get_all_observations(
        &self,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<vitalink_fhir::Observation>> {
        let observations = self.repository.get_all(limit, offset).await?;
        Ok(observations.iter().map(observation_to_wire).collect())
    }

    /// Runs a structured search.
    pub async fn search_observations(
        &self,
        params: &ObservationSearchParams,
    ) -> StorageResult<Vec<vitalink_fhir::Observation>> {
        let observations = self.repository.search(params).await?;
        Ok(observations.iter().map(observation_to_wire).collect())
    }

    /// Replaces an observation. The id from the path wins over the body.
    pub async fn update_observation(
        &self,
        id: &str,
        resource: vitalink_fhir::Observation,
    ) -> StorageResult<vitalink_fhir::Observation> {
        let mut observation = observation_from_wire(&resource);
        observation.id = Some(id.to_string());

        let updated = self.repository.update(observation).await?;
        debug!(id = %id, "Updated observation");
        Ok(observation_to_wire(&updated))
    }

    /// Deletes an observation.
    pub async fn delete_observation(&self, id: &str) -> StorageResult<()> {
        self.repository.delete(id).await?;
        debug!(id = %id, "Deleted observation");
        Ok(())
    }
}
