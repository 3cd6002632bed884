//! Observation wire resource <-> storage record.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use vitalink_fhir::{CodeableConcept, Coding, Quantity, Reference};
use vitalink_persistence::types::{
    Observation, ObservationComponent, ObservationStatus, ObservationValue,
};

const EFFECTIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const PATIENT_PREFIX: &str = "Patient/";

fn value_to_wire(value: &Option<ObservationValue>) -> (Option<Quantity>, Option<String>) {
    match value {
        Some(ObservationValue::Quantity { value, unit }) => (
            Some(Quantity {
                value: Some(*value),
                unit: Some(unit.clone()),
                ..Default::default()
            }),
            None,
        ),
        Some(ObservationValue::String(s)) if !s.is_empty() => (None, Some(s.clone())),
        _ => (None, None),
    }
}

fn value_from_wire(
    quantity: &Option<Quantity>,
    string: &Option<String>,
) -> Option<ObservationValue> {
    if let Some(Quantity {
        value: Some(value),
        unit,
        ..
    }) = quantity
    {
        return Some(ObservationValue::quantity(
            *value,
            unit.clone().unwrap_or_default(),
        ));
    }
    string
        .as_ref()
        .filter(|s| !s.is_empty())
        .map(|s| ObservationValue::String(s.clone()))
}

/// Returns `(system, code, display)` from the first coding, empty when absent.
fn first_coding(concept: &Option<CodeableConcept>) -> (String, String, String) {
    match concept.as_ref().and_then(CodeableConcept::first_coding) {
        Some(coding) => (
            coding.system.clone().unwrap_or_default(),
            coding.code.clone().unwrap_or_default(),
            coding.display.clone().unwrap_or_default(),
        ),
        None => Default::default(),
    }
}

fn component_to_wire(component: &ObservationComponent) -> vitalink_fhir::ObservationComponent {
    let (value_quantity, value_string) = value_to_wire(&component.value);
    vitalink_fhir::ObservationComponent {
        code: Some(CodeableConcept::from_coding(Coding::new(
            &component.code_system,
            &component.code,
            &component.code_display,
        ))),
        value_quantity,
        value_string,
    }
}

fn component_from_wire(component: &vitalink_fhir::ObservationComponent) -> ObservationComponent {
    let (code_system, code, code_display) = first_coding(&component.code);
    ObservationComponent {
        code,
        code_system,
        code_display,
        value: value_from_wire(&component.value_quantity, &component.value_string),
    }
}

/// Extracts the bare patient id from a `Patient/{id}` reference.
fn patient_id_from_subject(subject: &Option<Reference>) -> String {
    subject
        .as_ref()
        .and_then(|s| s.reference.as_deref())
        .filter(|r| r.len() > PATIENT_PREFIX.len())
        .and_then(|r| r.strip_prefix(PATIENT_PREFIX))
        .unwrap_or_default()
        .to_string()
}

/// Renders a stored observation as a wire resource.
pub fn observation_to_wire(observation: &Observation) -> vitalink_fhir::Observation {
    let category = (!observation.category.is_empty()).then(|| {
        vec![CodeableConcept::from_coding(Coding {
            system: None,
            code: Some(observation.category.clone()),
            display: Some(observation.category.clone()),
        })]
    });

    let subject = (!observation.patient_id.is_empty()).then(|| Reference {
        reference: Some(format!("{}{}", PATIENT_PREFIX, observation.patient_id)),
        display: None,
    });

    let component = (!observation.components.is_empty())
        .then(|| observation.components.iter().map(component_to_wire).collect());

    let (value_quantity, value_string) = value_to_wire(&observation.value);

    vitalink_fhir::Observation {
        id: observation.id.clone(),
        status: Some(observation.status.as_str().to_string()),
        category,
        code: Some(CodeableConcept::from_coding(Coding::new(
            &observation.code_system,
            &observation.code,
            &observation.code_display,
        ))),
        subject,
        effective_date_time: observation
            .effective_date
            .map(|dt| dt.format(EFFECTIVE_FORMAT).to_string()),
        issued: Some(
            observation
                .issued
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        value_quantity,
        value_string,
        component,
        ..Default::default()
    }
}

/// Flattens a wire resource into a storage record.
///
/// Unknown statuses read as `final`; an absent or unparseable `issued` is now.
pub fn observation_from_wire(resource: &vitalink_fhir::Observation) -> Observation {
    let category = resource
        .category
        .as_ref()
        .and_then(|categories| categories.first())
        .and_then(CodeableConcept::first_coding)
        .and_then(|coding| coding.code.clone())
        .unwrap_or_default();

    let (code_system, code, code_display) = first_coding(&resource.code);

    let effective_date = resource
        .effective_date_time
        .as_deref()
        .and_then(|s| NaiveDateTime::parse_from_str(s, EFFECTIVE_FORMAT).ok())
        .map(|dt| dt.and_utc());

    let issued = resource
        .issued
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Observation {
        id: resource.id.clone(),
        patient_id: patient_id_from_subject(&resource.subject),
        status: ObservationStatus::from_code(resource.status.as_deref().unwrap_or_default()),
        category,
        code,
        code_system,
        code_display,
        value: value_from_wire(&resource.value_quantity, &resource.value_string),
        effective_date,
        issued,
        components: resource
            .component
            .iter()
            .flatten()
            .map(component_from_wire)
            .collect(),
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn wire(value: serde_json::Value) -> vitalink_fhir::Observation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_wire_blood_pressure() {
        let observation = observation_from_wire(&wire(json!({
            "resourceType": "Observation",
            "status": "preliminary",
            "category": [{"coding": [{"code": "vital-signs", "display": "Vital Signs"}]}],
            "code": {"coding": [
                {"system": "http://loinc.org", "code": "85354-9", "display": "Blood pressure"},
                {"system": "urn:other", "code": "ignored"}
            ]},
            "subject": {"reference": "Patient/abc"},
            "effectiveDateTime": "2024-03-01T10:30:00Z",
            "issued": "2024-03-01T11:00:00+02:00",
            "component": [
                {
                    "code": {"coding": [{"code": "8480-6"}]},
                    "valueQuantity": {"value": 120, "unit": "mmHg"}
                },
                {
                    "code": {"coding": [{"code": "8462-4"}]},
                    "valueQuantity": {"value": 80}
                }
            ]
        })));

        assert_eq!(observation.status, ObservationStatus::Preliminary);
        assert_eq!(observation.category, "vital-signs");
        assert_eq!(observation.code, "85354-9");
        assert_eq!(observation.code_system, "http://loinc.org");
        assert_eq!(observation.code_display, "Blood pressure");
        assert_eq!(observation.patient_id, "abc");
        assert_eq!(
            observation.effective_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap())
        );
        assert_eq!(
            observation.issued,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(observation.components.len(), 2);
        assert_eq!(
            observation.components[0].value,
            Some(ObservationValue::quantity(120.0, "mmHg"))
        );
        assert_eq!(
            observation.components[1].value,
            Some(ObservationValue::quantity(80.0, ""))
        );
    }

    #[test]
    fn test_bogus_status_is_final() {
        let observation = observation_from_wire(&wire(json!({"status": "bogus"})));
        assert_eq!(observation.status, ObservationStatus::Final);

        let observation = observation_from_wire(&vitalink_fhir::Observation::default());
        assert_eq!(observation.status, ObservationStatus::Final);
    }

    #[test]
    fn test_issued_defaults_to_now() {
        let before = Utc::now();
        let observation = observation_from_wire(&wire(json!({"issued": "yesterday"})));
        assert!(observation.issued >= before);
    }

    #[test]
    fn test_subject_reference_rules() {
        let id = |reference: &str| {
            observation_from_wire(&wire(json!({"subject": {"reference": reference}}))).patient_id
        };
        assert_eq!(id("Patient/x"), "x");
        assert_eq!(id("Patient/"), "");
        assert_eq!(id("Group/abc123"), "");
        assert_eq!(id("abc"), "");
    }

    #[test]
    fn test_effective_date_requires_literal_z() {
        let observation =
            observation_from_wire(&wire(json!({"effectiveDateTime": "2024-03-01T10:30:00+01:00"})));
        assert!(observation.effective_date.is_none());
    }

    #[test]
    fn test_value_precedence() {
        let observation = observation_from_wire(&wire(json!({
            "valueQuantity": {"value": 98.6, "unit": "degF"},
            "valueString": "ignored"
        })));
        assert_eq!(
            observation.value,
            Some(ObservationValue::quantity(98.6, "degF"))
        );

        // A quantity without a numeric value falls through to the string
        let observation = observation_from_wire(&wire(json!({
            "valueQuantity": {"unit": "degF"},
            "valueString": "positive"
        })));
        assert_eq!(
            observation.value,
            Some(ObservationValue::String("positive".to_string()))
        );

        let observation = observation_from_wire(&wire(json!({"valueString": ""})));
        assert!(observation.value.is_none());
    }

    #[test]
    fn test_to_wire() {
        let observation = Observation {
            id: Some("65f1".to_string()),
            patient_id: "abc".to_string(),
            status: ObservationStatus::Amended,
            category: "laboratory".to_string(),
            code: "2345-7".to_string(),
            code_system: "http://loinc.org".to_string(),
            code_display: "Glucose".to_string(),
            value: Some(ObservationValue::quantity(5.4, "mmol/L")),
            effective_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            issued: Utc.with_ymd_and_hms(2024, 3, 1, 9, 15, 30).unwrap(),
            ..Default::default()
        };

        let value = serde_json::to_value(observation_to_wire(&observation)).unwrap();
        assert_eq!(
            value,
            json!({
                "resourceType": "Observation",
                "id": "65f1",
                "status": "amended",
                "category": [{"coding": [{"code": "laboratory", "display": "laboratory"}]}],
                "code": {"coding": [{
                    "system": "http://loinc.org",
                    "code": "2345-7",
                    "display": "Glucose"
                }]},
                "subject": {"reference": "Patient/abc"},
                "effectiveDateTime": "2024-03-01T08:00:00Z",
                "issued": "2024-03-01T09:15:30Z",
                "valueQuantity": {"value": 5.4, "unit": "mmol/L"}
            })
        );
    }

    #[test]
    fn test_to_wire_omits_empty_parts() {
        let observation = Observation {
            value: Some(ObservationValue::String(String::new())),
            ..Default::default()
        };
        let resource = observation_to_wire(&observation);
        assert!(resource.category.is_none());
        assert!(resource.subject.is_none());
        assert!(resource.value_string.is_none());
        assert!(resource.value_quantity.is_none());
        assert!(resource.component.is_none());
        assert_eq!(resource.status.as_deref(), Some("final"));
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let original = wire(json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"coding": [{"system": "http://loinc.org", "code": "8867-4", "display": "Heart rate"}]},
            "subject": {"reference": "Patient/p1"},
            "effectiveDateTime": "2024-01-01T00:00:00Z",
            "issued": "2024-01-01T00:05:00Z",
            "valueString": "regular"
        }));

        let once = observation_to_wire(&observation_from_wire(&original));
        let twice = observation_to_wire(&observation_from_wire(&once));
        assert_eq!(once, twice);
        assert_eq!(once.value_string.as_deref(), Some("regular"));
    }
}
