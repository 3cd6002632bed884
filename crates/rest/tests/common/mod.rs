//! Common test utilities for REST API testing.
//!
//! Patients go to an in-memory SQLite database. Observations go to an
//! in-process repository so the HTTP tests run without a MongoDB server.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use vitalink_persistence::backends::sqlite::SqliteBackend;
use vitalink_persistence::core::ObservationRepository;
use vitalink_persistence::error::{StorageError, StorageResult};
use vitalink_persistence::types::{Observation, ObservationSearchParams};
use vitalink_rest::{ServerConfig, create_app_with_config};

/// Observation store backed by a `Vec`, newest `issued` first.
#[derive(Default)]
pub struct InMemoryObservations {
    records: Mutex<Vec<Observation>>,
    next_id: AtomicU64,
}

impl InMemoryObservations {
    fn page(mut found: Vec<Observation>, limit: u32, offset: u64) -> Vec<Observation> {
        found.sort_by(|a, b| b.issued.cmp(&a.issued));
        found
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}

#[async_trait]
impl ObservationRepository for InMemoryObservations {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, observation: Observation) -> StorageResult<Observation> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let stored = Observation {
            id: Some(format!("{:024x}", id)),
            created_at: Some(now),
            updated_at: Some(now),
            ..observation
        };
        self.records.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Observation> {
        self.records
            .lock()
            .await
            .iter()
            .find(|o| o.id_str() == id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Observation", id))
    }

    async fn get_by_patient_id(
        &self,
        patient_id: &str,
        limit: u32,
        offset: u64,
    ) -> StorageResult<Vec<Observation>> {
        let found = self
            .records
            .lock()
            .await
            .iter()
            .filter(|o| o.patient_id == patient_id)
            .cloned()
            .collect();
        Ok(Self::page(found, limit, offset))
    }

    async fn get_all(&self, limit: u32, offset: u64) -> StorageResult<Vec<Observation>> {
        let found = self.records.lock().await.clone();
        Ok(Self::page(found, limit, offset))
    }

    async fn search(&self, params: &ObservationSearchParams) -> StorageResult<Vec<Observation>> {
        let matches = |value: &str, filter: &Option<String>| {
            filter.as_deref().is_none_or(|f| f == value)
        };
        let found = self
            .records
            .lock()
            .await
            .iter()
            .filter(|o| {
                matches(&o.patient_id, &params.patient_id)
                    && matches(&o.code, &params.code)
                    && matches(&o.category, &params.category)
                    && matches(o.status.as_str(), &params.status)
            })
            .cloned()
            .collect();
        Ok(Self::page(found, params.limit, params.offset))
    }

    async fn update(&self, observation: Observation) -> StorageResult<Observation> {
        let mut records = self.records.lock().await;
        let existing = records
            .iter_mut()
            .find(|o| o.id == observation.id)
            .ok_or_else(|| StorageError::not_found("Observation", observation.id_str()))?;

        *existing = Observation {
            created_at: existing.created_at,
            updated_at: Some(Utc::now()),
            ..observation
        };
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|o| o.id_str() != id);
        if records.len() == before {
            return Err(StorageError::not_found("Observation", id));
        }
        Ok(())
    }
}

/// Creates a test server over fresh stores.
pub fn create_test_server() -> TestServer {
    let patients = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    patients.init_schema().expect("Failed to init schema");

    let app = create_app_with_config(
        patients,
        InMemoryObservations::default(),
        ServerConfig::for_testing(),
    );
    TestServer::new(app).expect("Failed to create test server")
}

/// A Patient body with one name.
pub fn patient_json(given: &str, family: &str, gender: &str, birth_date: &str) -> Value {
    json!({
        "resourceType": "Patient",
        "name": [{"family": family, "given": [given]}],
        "gender": gender,
        "birthDate": birth_date
    })
}

/// A systolic blood pressure reading for the given patient.
pub fn systolic_json(patient_id: &str, value: f64, issued: &str) -> Value {
    json!({
        "resourceType": "Observation",
        "status": "final",
        "category": [{"coding": [{"code": "vital-signs"}]}],
        "code": {"coding": [{
            "system": "http://loinc.org",
            "code": "8480-6",
            "display": "Systolic blood pressure"
        }]},
        "subject": {"reference": format!("Patient/{}", patient_id)},
        "effectiveDateTime": "2024-03-01T08:00:00Z",
        "issued": issued,
        "valueQuantity": {"value": value, "unit": "mmHg"}
    })
}

/// POSTs a resource and returns the created body.
pub async fn create(server: &TestServer, path: &str, body: &Value) -> Value {
    let response = server.post(path).json(body).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Returns the `entry[].resource` values of a searchset Bundle.
pub fn entries(bundle: &Value) -> Vec<Value> {
    bundle["entry"]
        .as_array()
        .map(|entries| entries.iter().map(|e| e["resource"].clone()).collect())
        .unwrap_or_default()
}

/// Returns the family names in a Patient searchset, in order.
pub fn families(bundle: &Value) -> Vec<String> {
    entries(bundle)
        .iter()
        .map(|p| p["name"][0]["family"].as_str().unwrap_or_default().to_string())
        .collect()
}
