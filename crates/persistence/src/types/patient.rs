//! Patient domain record.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Administrative gender.
///
/// See: https://hl7.org/fhir/R4/valueset-administrative-gender.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl AdministrativeGender {
    /// Returns the code as stored and exchanged.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdministrativeGender::Male => "male",
            AdministrativeGender::Female => "female",
            AdministrativeGender::Other => "other",
            AdministrativeGender::Unknown => "unknown",
        }
    }

    /// Parses a code. Anything unrecognized is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "male" => AdministrativeGender::Male,
            "female" => AdministrativeGender::Female,
            "other" => AdministrativeGender::Other,
            _ => AdministrativeGender::Unknown,
        }
    }
}

impl fmt::Display for AdministrativeGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient as held by the relational store.
///
/// Only the first name entry and its first given name are kept; multi-name
/// resources are flattened on the way in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patient {
    /// Assigned by storage on create.
    pub id: Option<String>,
    pub identifier_system: Option<String>,
    pub identifier_value: Option<String>,
    pub active: bool,
    pub family_name: String,
    pub given_name: String,
    pub gender: AdministrativeGender,
    pub birth_date: Option<NaiveDate>,
    /// Assigned by storage on create.
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed by storage on every update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Patient {
    /// Returns the id, or an empty string for records that were never stored.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_codes() {
        for gender in [
            AdministrativeGender::Male,
            AdministrativeGender::Female,
            AdministrativeGender::Other,
            AdministrativeGender::Unknown,
        ] {
            assert_eq!(AdministrativeGender::from_code(gender.as_str()), gender);
        }
    }

    #[test]
    fn test_unrecognized_gender_is_unknown() {
        assert_eq!(
            AdministrativeGender::from_code("Male"),
            AdministrativeGender::Unknown
        );
        assert_eq!(
            AdministrativeGender::from_code(""),
            AdministrativeGender::Unknown
        );
    }

    #[test]
    fn test_default_patient() {
        let patient = Patient::default();
        assert!(patient.id.is_none());
        assert_eq!(patient.id_str(), "");
        assert_eq!(patient.gender, AdministrativeGender::Unknown);
    }
}
