//! PatientRepository implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{Connection, Row, params};

use crate::core::PatientRepository;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::{PATIENT_COLUMNS, PatientQueryBuilder, PlaceholderStyle, SqlFragment, SqlParam};
use crate::types::{AdministrativeGender, Patient, PatientSearchParams};

use super::SqliteBackend;

const RESOURCE_TYPE: &str = "Patient";

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Fixed-width UTC text, so that `ORDER BY created_at` sorts chronologically.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| internal_error(format!("Failed to parse timestamp '{}': {}", s, e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Raw column values, converted outside the rusqlite row callback.
struct PatientRow {
    id: String,
    identifier_system: Option<String>,
    identifier_value: Option<String>,
    active: bool,
    family_name: String,
    given_name: String,
    gender: String,
    birth_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    /// Reads the columns listed in [`PATIENT_COLUMNS`], in order.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            identifier_system: row.get(1)?,
            identifier_value: row.get(2)?,
            active: row.get(3)?,
            family_name: row.get(4)?,
            given_name: row.get(5)?,
            gender: row.get(6)?,
            birth_date: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_patient(self) -> StorageResult<Patient> {
        let birth_date = match self.birth_date {
            Some(s) => Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                internal_error(format!("Failed to parse birth_date '{}': {}", s, e))
            })?),
            None => None,
        };

        Ok(Patient {
            id: Some(self.id),
            identifier_system: self.identifier_system,
            identifier_value: self.identifier_value,
            active: self.active,
            family_name: self.family_name,
            given_name: self.given_name,
            gender: AdministrativeGender::from_code(&self.gender),
            birth_date,
            created_at: Some(parse_timestamp(&self.created_at)?),
            updated_at: Some(parse_timestamp(&self.updated_at)?),
        })
    }
}

fn bind_params(params: &[SqlParam]) -> Vec<Box<dyn rusqlite::ToSql>> {
    params
        .iter()
        .map(|param| -> Box<dyn rusqlite::ToSql> {
            match param {
                SqlParam::Text(s) => Box::new(s.clone()),
                SqlParam::Integer(i) => Box::new(*i),
                SqlParam::Bool(b) => Box::new(*b),
                SqlParam::Date(d) => Box::new(format_date(*d)),
            }
        })
        .collect()
}

fn query_patients(conn: &Connection, query: &SqlFragment) -> StorageResult<Vec<Patient>> {
    let mut stmt = conn
        .prepare(&query.sql)
        .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;

    let all_params = bind_params(&query.params);
    let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), PatientRow::from_row)
        .map_err(|e| internal_error(format!("Failed to execute search: {}", e)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;

    rows.into_iter().map(PatientRow::into_patient).collect()
}

fn fetch_patient(conn: &Connection, id: &str) -> StorageResult<Patient> {
    let result = conn.query_row(
        &format!("SELECT {} FROM patients WHERE id = ?1", PATIENT_COLUMNS),
        params![id],
        PatientRow::from_row,
    );

    match result {
        Ok(row) => row.into_patient(),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::not_found(RESOURCE_TYPE, id)),
        Err(e) => Err(internal_error(format!("Failed to read patient: {}", e))),
    }
}

impl SqliteBackend {
    fn query_builder(&self) -> PatientQueryBuilder {
        PatientQueryBuilder::new(PlaceholderStyle::Question)
    }
}

#[async_trait]
impl PatientRepository for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, patient: Patient) -> StorageResult<Patient> {
        let conn = self.get_connection()?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().trunc_subsecs(6);
        let now_str = format_timestamp(now);

        conn.execute(
            "INSERT INTO patients (id, identifier_system, identifier_value, active, family_name,
                                   given_name, gender, birth_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                patient.identifier_system,
                patient.identifier_value,
                patient.active,
                patient.family_name,
                patient.given_name,
                patient.gender.as_str(),
                patient.birth_date.map(format_date),
                now_str,
                now_str,
            ],
        )
        .map_err(|e| internal_error(format!("Failed to insert patient: {}", e)))?;

        tracing::debug!(id = %id, "Created patient");

        Ok(Patient {
            id: Some(id),
            created_at: Some(now),
            updated_at: Some(now),
            ..patient
        })
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Patient> {
        let conn = self.get_connection()?;
        fetch_patient(&conn, id)
    }

    async fn get_all(&self, limit: u32, offset: u64) -> StorageResult<Vec<Patient>> {
        let conn = self.get_connection()?;
        query_patients(&conn, &self.query_builder().build_list(limit, offset))
    }

    async fn search(&self, params: &PatientSearchParams) -> StorageResult<Vec<Patient>> {
        let conn = self.get_connection()?;
        let query = self.query_builder().build(params);
        tracing::debug!(sql = %query.sql, params = query.params.len(), "Executing patient search");
        query_patients(&conn, &query)
    }

    async fn update(&self, patient: Patient) -> StorageResult<Patient> {
        let id = patient.id_str().to_string();
        let conn = self.get_connection()?;
        let now = Utc::now().trunc_subsecs(6);

        let changed = conn
            .execute(
                "UPDATE patients
                 SET identifier_system = ?1, identifier_value = ?2, active = ?3,
                     family_name = ?4, given_name = ?5, gender = ?6, birth_date = ?7,
                     updated_at = ?8
                 WHERE id = ?9",
                params![
                    patient.identifier_system,
                    patient.identifier_value,
                    patient.active,
                    patient.family_name,
                    patient.given_name,
                    patient.gender.as_str(),
                    patient.birth_date.map(format_date),
                    format_timestamp(now),
                    id,
                ],
            )
            .map_err(|e| internal_error(format!("Failed to update patient: {}", e)))?;

        if changed == 0 {
            return Err(StorageError::not_found(RESOURCE_TYPE, id));
        }

        fetch_patient(&conn, &id)
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        let conn = self.get_connection()?;

        let changed = conn
            .execute("DELETE FROM patients WHERE id = ?1", params![id])
            .map_err(|e| internal_error(format!("Failed to delete patient: {}", e)))?;

        if changed == 0 {
            return Err(StorageError::not_found(RESOURCE_TYPE, id));
        }

        tracing::debug!(id = %id, "Deleted patient");
        Ok(())
    }
}
