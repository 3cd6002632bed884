//! The FHIR R4 `Observation` resource, restricted to the elements this server exchanges.

use serde::{Deserialize, Serialize};

use crate::datatypes::{CodeableConcept, Quantity, Reference};

fn observation_resource_type() -> String {
    "Observation".to_string()
}

/// Measurements and simple assertions made about a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default = "observation_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Status code. Kept as a string so unrecognized statuses decode instead of failing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Vec<ObservationComponent>>,
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            resource_type: observation_resource_type(),
            id: None,
            status: None,
            category: None,
            code: None,
            subject: None,
            effective_date_time: None,
            issued: None,
            value_quantity: None,
            value_string: None,
            component: None,
        }
    }
}

/// A component observation, e.g. the systolic half of a blood pressure reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_blood_pressure() {
        let observation: Observation = serde_json::from_value(json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"coding": [{"system": "http://loinc.org", "code": "85354-9"}]},
            "subject": {"reference": "Patient/abc"},
            "effectiveDateTime": "2024-03-01T10:30:00Z",
            "component": [
                {
                    "code": {"coding": [{"code": "8480-6"}]},
                    "valueQuantity": {"value": 120, "unit": "mmHg"}
                },
                {
                    "code": {"coding": [{"code": "8462-4"}]},
                    "valueQuantity": {"value": 80.5, "unit": "mmHg"}
                }
            ]
        }))
        .unwrap();

        let components = observation.component.unwrap();
        assert_eq!(components.len(), 2);
        assert_eq!(
            components[1].value_quantity.as_ref().unwrap().value,
            Some(80.5)
        );
        assert_eq!(
            observation.subject.unwrap().reference.as_deref(),
            Some("Patient/abc")
        );
    }

    #[test]
    fn test_unknown_status_decodes() {
        let observation: Observation =
            serde_json::from_value(json!({"resourceType": "Observation", "status": "bogus"}))
                .unwrap();
        assert_eq!(observation.status.as_deref(), Some("bogus"));
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let observation = Observation {
            value_string: Some("positive".to_string()),
            effective_date_time: Some("2024-01-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&observation).unwrap();
        assert_eq!(value["resourceType"], "Observation");
        assert_eq!(value["valueString"], "positive");
        assert_eq!(value["effectiveDateTime"], "2024-01-01T00:00:00Z");
        assert!(value.get("valueQuantity").is_none());
    }
}
