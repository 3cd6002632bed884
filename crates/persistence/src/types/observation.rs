//! Observation domain record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Observation status.
///
/// Only the four statuses this server tracks are modelled; every other code
/// collapses to `Final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    #[default]
    Final,
    Amended,
}

impl ObservationStatus {
    /// Returns the status code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationStatus::Registered => "registered",
            ObservationStatus::Preliminary => "preliminary",
            ObservationStatus::Final => "final",
            ObservationStatus::Amended => "amended",
        }
    }

    /// Parses a status code, falling back to `Final`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "registered" => ObservationStatus::Registered,
            "preliminary" => ObservationStatus::Preliminary,
            "amended" => ObservationStatus::Amended,
            _ => ObservationStatus::Final,
        }
    }
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result value of an observation or component.
///
/// A reading is either a measured quantity or free text, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationValue {
    Quantity { value: f64, unit: String },
    String(String),
}

impl ObservationValue {
    /// Creates a quantity value.
    pub fn quantity(value: f64, unit: impl Into<String>) -> Self {
        ObservationValue::Quantity {
            value,
            unit: unit.into(),
        }
    }
}

/// One coded part of a multi-part observation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationComponent {
    pub code: String,
    pub code_system: String,
    pub code_display: String,
    pub value: Option<ObservationValue>,
}

/// An observation as held by the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Assigned by storage on create.
    pub id: Option<String>,
    /// Bare patient id, without the `Patient/` prefix.
    pub patient_id: String,
    pub status: ObservationStatus,
    pub category: String,
    pub code: String,
    pub code_system: String,
    pub code_display: String,
    pub value: Option<ObservationValue>,
    pub effective_date: Option<DateTime<Utc>>,
    pub issued: DateTime<Utc>,
    pub components: Vec<ObservationComponent>,
    /// Assigned by storage on create.
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed by storage on every update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            id: None,
            patient_id: String::new(),
            status: ObservationStatus::Final,
            category: String::new(),
            code: String::new(),
            code_system: String::new(),
            code_display: String::new(),
            value: None,
            effective_date: None,
            issued: Utc::now(),
            components: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Observation {
    /// Returns the id, or an empty string for records that were never stored.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}
