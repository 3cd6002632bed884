//! Patient wire resource <-> storage record.

use chrono::NaiveDate;
use vitalink_fhir::{HumanName, Identifier};
use vitalink_persistence::types::{AdministrativeGender, Patient};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Renders a stored patient as a wire resource.
pub fn patient_to_wire(patient: &Patient) -> vitalink_fhir::Patient {
    let identifier = match (&patient.identifier_system, &patient.identifier_value) {
        (Some(system), Some(value)) if !system.is_empty() && !value.is_empty() => {
            Some(vec![Identifier {
                system: Some(system.clone()),
                value: Some(value.clone()),
            }])
        }
        _ => None,
    };

    vitalink_fhir::Patient {
        id: patient.id.clone(),
        identifier,
        active: Some(patient.active),
        name: Some(vec![HumanName {
            use_: None,
            family: Some(patient.family_name.clone()),
            given: Some(vec![patient.given_name.clone()]),
        }]),
        gender: Some(patient.gender.as_str().to_string()),
        birth_date: patient
            .birth_date
            .map(|date| date.format(DATE_FORMAT).to_string()),
        ..Default::default()
    }
}

/// Flattens a wire resource into a storage record.
///
/// Only the first name, its first given name and the first identifier are
/// kept. A missing `active` reads as `false`.
pub fn patient_from_wire(resource: &vitalink_fhir::Patient) -> Patient {
    let name = resource.name.as_ref().and_then(|names| names.first());
    let identifier = resource.identifier.as_ref().and_then(|ids| ids.first());

    Patient {
        id: resource.id.clone(),
        identifier_system: identifier.and_then(|i| i.system.clone()),
        identifier_value: identifier.and_then(|i| i.value.clone()),
        active: resource.active.unwrap_or(false),
        family_name: name.and_then(|n| n.family.clone()).unwrap_or_default(),
        given_name: name
            .and_then(|n| n.given.as_ref())
            .and_then(|given| given.first())
            .cloned()
            .unwrap_or_default(),
        gender: resource
            .gender
            .as_deref()
            .map(AdministrativeGender::from_code)
            .unwrap_or_default(),
        birth_date: resource
            .birth_date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, DATE_FORMAT).ok()),
        created_at: None,
        updated_at: None,
    }
}
