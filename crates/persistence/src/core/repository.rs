//! Repository traits.
//!
//! One trait per resource kind, each implemented once per storage engine. The
//! search compilers produce the arguments that `search` hands to the engine;
//! callers never talk to a database directly.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Observation, ObservationSearchParams, Patient, PatientSearchParams};

/// CRUD + search over Patient records.
///
/// # Errors
///
/// Point operations on an id that does not exist (`get_by_id`, `update`,
/// `delete`) return `StorageError::Resource(NotFound)`. Every other failure is a
/// backend error, returned as the engine reported it.
///
/// # Example
///
/// ```ignore
/// use vitalink_persistence::core::PatientRepository;
/// use vitalink_persistence::types::{Patient, PatientSearchParams};
///
/// async fn example<R: PatientRepository>(repo: &R) -> StorageResult<()> {
///     let created = repo.create(Patient {
///         family_name: "Smith".to_string(),
///         active: true,
///         ..Default::default()
///     }).await?;
///
///     let found = repo.search(&PatientSearchParams::from_query_string("name=smi")).await?;
///     assert!(found.iter().any(|p| p.id == created.id));
///
///     repo.delete(created.id_str()).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Stores a new patient. Storage assigns the id and both timestamps.
    async fn create(&self, patient: Patient) -> StorageResult<Patient>;

    /// Fetches a patient by id.
    async fn get_by_id(&self, id: &str) -> StorageResult<Patient>;

    /// Lists patients, newest first.
    async fn get_all(&self, limit: u32, offset: u64) -> StorageResult<Vec<Patient>>;

    /// Runs a compiled search.
    async fn search(&self, params: &PatientSearchParams) -> StorageResult<Vec<Patient>>;

    /// Replaces every field of the patient identified by `patient.id`.
    ///
    /// Returns the record with a refreshed `updated_at`.
    async fn update(&self, patient: Patient) -> StorageResult<Patient>;

    /// Removes a patient.
    async fn delete(&self, id: &str) -> StorageResult<()>;
}

/// CRUD + search over Observation records.
///
/// Same error contract as [`PatientRepository`].
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Stores a new observation. Storage assigns the id and both timestamps.
    async fn create(&self, observation: Observation) -> StorageResult<Observation>;

    /// Fetches an observation by id.
    async fn get_by_id(&self, id: &str) -> StorageResult<Observation>;

    /// Lists observations for one patient, newest first.
    async fn get_by_patient_id(
        &self,
        patient_id: &str,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<Observation>>;

    /// Lists observations, newest first.
    async fn get_all(&self, limit: u32, offset: u64) -> StorageResult<Vec<Observation>>;

    /// Runs a compiled search.
    async fn search(&self, params: &ObservationSearchParams) -> StorageResult<Vec<Observation>>;

    /// Replaces every field of the observation identified by `observation.id`.
    async fn update(&self, observation: Observation) -> StorageResult<Observation>;

    /// Removes an observation.
    async fn delete(&self, id: &str) -> StorageResult<()>;
}
