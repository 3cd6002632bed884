//! PatientRepository implementation for PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

use crate::core::PatientRepository;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::{PATIENT_COLUMNS, PatientQueryBuilder, PlaceholderStyle, SqlFragment, SqlParam};
use crate::types::{AdministrativeGender, Patient, PatientSearchParams};

use super::PostgresBackend;

const RESOURCE_TYPE: &str = "Patient";

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "postgres".to_string(),
        message,
        source: None,
    })
}

fn bind_params(params: &[SqlParam]) -> Vec<Box<dyn ToSql + Sync + Send>> {
    params
        .iter()
        .map(|param| -> Box<dyn ToSql + Sync + Send> {
            match param {
                SqlParam::Text(s) => Box::new(s.clone()),
                SqlParam::Integer(i) => Box::new(*i),
                SqlParam::Bool(b) => Box::new(*b),
                SqlParam::Date(d) => Box::new(*d),
            }
        })
        .collect()
}

/// Reads the columns listed in [`PATIENT_COLUMNS`], in order.
fn row_to_patient(row: &Row) -> StorageResult<Patient> {
    let id: Uuid = row.try_get(0)?;
    let gender: String = row.try_get(6)?;
    let birth_date: Option<NaiveDate> = row.try_get(7)?;
    let created_at: DateTime<Utc> = row.try_get(8)?;
    let updated_at: DateTime<Utc> = row.try_get(9)?;

    Ok(Patient {
        id: Some(id.to_string()),
        identifier_system: row.try_get(1)?,
        identifier_value: row.try_get(2)?,
        active: row.try_get(3)?,
        family_name: row.try_get(4)?,
        given_name: row.try_get(5)?,
        gender: AdministrativeGender::from_code(&gender),
        birth_date,
        created_at: Some(created_at),
        updated_at: Some(updated_at),
    })
}

fn parse_id(id: &str) -> StorageResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| {
        StorageError::Backend(BackendError::QueryError {
            message: format!("invalid patient ID: {}", id),
        })
    })
}

impl PostgresBackend {
    async fn query_patients(&self, query: &SqlFragment) -> StorageResult<Vec<Patient>> {
        let client = self.get_client().await?;

        let all_params = bind_params(&query.params);
        let param_refs: Vec<&(dyn ToSql + Sync)> = all_params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let rows = client
            .query(&query.sql, &param_refs)
            .await
            .map_err(|e| internal_error(format!("Failed to execute search: {}", e)))?;

        rows.iter().map(row_to_patient).collect()
    }

    fn query_builder(&self) -> PatientQueryBuilder {
        PatientQueryBuilder::new(PlaceholderStyle::Dollar)
    }
}

#[async_trait]
impl PatientRepository for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, patient: Patient) -> StorageResult<Patient> {
        let client = self.get_client().await?;

        let row = client
            .query_one(
                "INSERT INTO patients (identifier_system, identifier_value, active, family_name,
                                       given_name, gender, birth_date)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id, created_at, updated_at",
                &[
                    &patient.identifier_system,
                    &patient.identifier_value,
                    &patient.active,
                    &patient.family_name,
                    &patient.given_name,
                    &patient.gender.as_str(),
                    &patient.birth_date,
                ],
            )
            .await
            .map_err(|e| internal_error(format!("Failed to insert patient: {}", e)))?;

        let id: Uuid = row.try_get(0)?;
        let created_at: DateTime<Utc> = row.try_get(1)?;
        let updated_at: DateTime<Utc> = row.try_get(2)?;

        tracing::debug!(id = %id, "Created patient");

        Ok(Patient {
            id: Some(id.to_string()),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
            ..patient
        })
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Patient> {
        let uuid = parse_id(id)?;
        let client = self.get_client().await?;

        let row = client
            .query_opt(
                &format!("SELECT {} FROM patients WHERE id = $1", PATIENT_COLUMNS),
                &[&uuid],
            )
            .await
            .map_err(|e| internal_error(format!("Failed to read patient: {}", e)))?;

        match row {
            Some(row) => row_to_patient(&row),
            None => Err(StorageError::not_found(RESOURCE_TYPE, id)),
        }
    }

    async fn get_all(&self, limit: u32, offset: u64) -> StorageResult<Vec<Patient>> {
        self.query_patients(&self.query_builder().build_list(limit, offset))
            .await
    }

    async fn search(&self, params: &PatientSearchParams) -> StorageResult<Vec<Patient>> {
        let query = self.query_builder().build(params);
        tracing::debug!(sql = %query.sql, params = query.params.len(), "Executing patient search");
        self.query_patients(&query).await
    }

    async fn update(&self, patient: Patient) -> StorageResult<Patient> {
        let uuid = parse_id(patient.id_str())?;
        let client = self.get_client().await?;

        let row = client
            .query_opt(
                &format!(
                    "UPDATE patients
                     SET identifier_system = $1, identifier_value = $2, active = $3,
                         family_name = $4, given_name = $5, gender = $6, birth_date = $7,
                         updated_at = NOW()
                     WHERE id = $8
                     RETURNING {}",
                    PATIENT_COLUMNS
                ),
                &[
                    &patient.identifier_system,
                    &patient.identifier_value,
                    &patient.active,
                    &patient.family_name,
                    &patient.given_name,
                    &patient.gender.as_str(),
                    &patient.birth_date,
                    &uuid,
                ],
            )
            .await
            .map_err(|e| internal_error(format!("Failed to update patient: {}", e)))?;

        match row {
            Some(row) => row_to_patient(&row),
            None => Err(StorageError::not_found(RESOURCE_TYPE, patient.id_str())),
        }
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let uuid = parse_id(id)?;
        let client = self.get_client().await?;

        let deleted = client
            .execute("DELETE FROM patients WHERE id = $1", &[&uuid])
            .await
            .map_err(|e| internal_error(format!("Failed to delete patient: {}", e)))?;

        if deleted == 0 {
            return Err(StorageError::not_found(RESOURCE_TYPE, id));
        }

        tracing::debug!(id = %id, "Deleted patient");
        Ok(())
    }
}
