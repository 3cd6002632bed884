//! The FHIR R4 `Patient` resource, restricted to the elements this server exchanges.

use serde::{Deserialize, Serialize};

use crate::datatypes::{HumanName, Identifier};

fn patient_resource_type() -> String {
    "Patient".to_string()
}

/// Demographics and identification for a person receiving care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default = "patient_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Vec<HumanName>>,
    /// Administrative gender code. Kept as a string so unknown codes survive decoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl Default for Patient {
    fn default() -> Self {
        Self {
            resource_type: patient_resource_type(),
            id: None,
            identifier: None,
            active: None,
            name: None,
            gender: None,
            birth_date: None,
        }
    }
}

impl Patient {
    /// Returns true when at least one name entry has a family or given part.
    pub fn has_usable_name(&self) -> bool {
        self.name
            .as_ref()
            .is_some_and(|names| names.iter().any(HumanName::has_content))
    }
}
