//! Patient use cases.

use std::sync::Arc;

use tracing::debug;
use vitalink_persistence::core::PatientRepository;
use vitalink_persistence::error::StorageResult;
use vitalink_persistence::types::PatientSearchParams;

use crate::mapping::{patient_from_wire, patient_to_wire};

/// Patient operations over a [`PatientRepository`].
pub struct PatientService<R> {
    repository: Arc<R>,
}

impl<R> Clone for PatientService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: PatientRepository> PatientService<R> {
    /// Creates a service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Stores a new patient. An absent `active` is stored as `true`.
    pub async fn create_patient(
        &self,
        resource: vitalink_fhir::Patient,
    ) -> StorageResult<vitalink_fhir::Patient> {
        let mut patient = patient_from_wire(&resource);
        if resource.active.is_none() {
            patient.active = true;
        }

        let created = self.repository.create(patient).await?;
        debug!(id = %created.id_str(), "Created patient");
        Ok(patient_to_wire(&created))
    }

    /// Reads one patient.
    pub async fn get_patient(&self, id: &str) -> StorageResult<vitalink_fhir::Patient> {
        let patient = self.repository.get_by_id(id).await?;
        Ok(patient_to_wire(&patient))
    }

    /// Lists patients without filtering.
    pub async fn get_all_patients(
        &self,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<vitalink_fhir::Patient>> {
        let patients = self.repository.get_all(limit, offset).await?;
        Ok(patients.iter().map(patient_to_wire).collect())
    }

    /// Runs a structured search.
    pub async fn search_patients(
        &self,
        params: &PatientSearchParams,
    ) -> StorageResult<Vec<vitalink_fhir::Patient>> {
        let patients = self.repository.search(params).await?;
        Ok(patients.iter().map(patient_to_wire).collect())
    }

    /// Replaces a patient. The id from the path wins over the body.
    pub async fn update_patient(
        &self,
        id: &str,
        resource: vitalink_fhir::Patient,
    ) -> StorageResult<vitalink_fhir::Patient> {
        let mut patient = patient_from_wire(&resource);
        patient.id = Some(id.to_string());

        let updated = self.repository.update(patient).await?;
        debug!(id = %id, "Updated patient");
        Ok(patient_to_wire(&updated))
    }

    /// Deletes a patient.
    pub async fn delete_patient(&self, id: &str) -> StorageResult<()> {
        self.repository.delete(id).await?;
        debug!(id = %id, "Deleted patient");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use vitalink_persistence::error::StorageError;
    use vitalink_persistence::types::Patient;

    /// Records what reaches the repository and echoes it back.
    #[derive(Default)]
    struct RecordingRepository {
        last: Mutex<Option<Patient>>,
    }

    impl RecordingRepository {
        fn last(&self) -> Patient {
            self.last.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl PatientRepository for RecordingRepository {
        fn backend_name(&self) -> &'static str {
            "recording"
        }

        async fn create(&self, patient: Patient) -> StorageResult<Patient> {
            *self.last.lock().unwrap() = Some(patient.clone());
            Ok(Patient {
                id: Some("new-id".to_string()),
                ..patient
            })
        }

        async fn get_by_id(&self, id: &str) -> StorageResult<Patient> {
            Err(StorageError::not_found("Patient", id))
        }

        async fn get_all(&self, _limit: u32, _offset: u64) -> StorageResult<Vec<Patient>> {
            Ok(Vec::new())
        }

        async fn search(&self, _params: &PatientSearchParams) -> StorageResult<Vec<Patient>> {
            Ok(Vec::new())
        }

        async fn update(&self, patient: Patient) -> StorageResult<Patient> {
            *self.last.lock().unwrap() = Some(patient.clone());
            Ok(patient)
        }

        async fn delete(&self, id: &str) -> StorageResult<()> {
            Err(StorageError::not_found("Patient", id))
        }
    }

    fn service() -> (PatientService<RecordingRepository>, Arc<RecordingRepository>) {
        let repository = Arc::new(RecordingRepository::default());
        (PatientService::new(Arc::clone(&repository)), repository)
    }

    fn wire(value: serde_json::Value) -> vitalink_fhir::Patient {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults_active_to_true() {
        let (service, repository) = service();

        let created = service
            .create_patient(wire(json!({"name": [{"family": "Smith"}]})))
            .await
            .unwrap();

        assert!(repository.last().active);
        assert_eq!(created.active, Some(true));
        assert_eq!(created.id.as_deref(), Some("new-id"));
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_false() {
        let (service, repository) = service();

        let created = service
            .create_patient(wire(json!({"active": false, "name": [{"family": "Smith"}]})))
            .await
            .unwrap();

        assert!(!repository.last().active);
        assert_eq!(created.active, Some(false));
    }

    #[tokio::test]
    async fn test_update_uses_path_id() {
        let (service, repository) = service();

        service
            .update_patient("path-id", wire(json!({"id": "body-id", "active": true})))
            .await
            .unwrap();

        assert_eq!(repository.last().id.as_deref(), Some("path-id"));
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let (service, _) = service();

        assert!(service.get_patient("x").await.unwrap_err().is_not_found());
        assert!(service.delete_patient("x").await.unwrap_err().is_not_found());
    }
}
