//! Conversion between [`Observation`] and its BSON document.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, Bson, Document, doc};

use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Observation, ObservationComponent, ObservationStatus, ObservationValue};

/// Optional top-level fields. Absent values are removed on update.
pub(crate) const OPTIONAL_FIELDS: [&str; 5] = [
    "value_quantity",
    "value_unit",
    "value_string",
    "effective_date",
    "components",
];

pub(crate) fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: &bson::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(dt.timestamp_millis())
}

fn insert_value(doc: &mut Document, value: &Option<ObservationValue>) {
    match value {
        Some(ObservationValue::Quantity { value, unit }) => {
            doc.insert("value_quantity", *value);
            if !unit.is_empty() {
                doc.insert("value_unit", unit.as_str());
            }
        }
        Some(ObservationValue::String(s)) if !s.is_empty() => {
            doc.insert("value_string", s.as_str());
        }
        _ => {}
    }
}

fn read_value(doc: &Document) -> Option<ObservationValue> {
    let quantity = match doc.get("value_quantity") {
        Some(Bson::Double(v)) => Some(*v),
        Some(Bson::Int32(v)) => Some(f64::from(*v)),
        Some(Bson::Int64(v)) => Some(*v as f64),
        _ => None,
    };

    if let Some(value) = quantity {
        return Some(ObservationValue::quantity(value, str_field(doc, "value_unit")));
    }

    match doc.get_str("value_string") {
        Ok(s) if !s.is_empty() => Some(ObservationValue::String(s.to_string())),
        _ => None,
    }
}

fn str_field(doc: &Document, key: &str) -> String {
    doc.get_str(key).unwrap_or_default().to_string()
}

fn datetime_field(doc: &Document, key: &str) -> Option<DateTime<Utc>> {
    doc.get_datetime(key).ok().and_then(from_bson_datetime)
}

fn component_to_document(component: &ObservationComponent) -> Document {
    let mut doc = doc! {
        "code": component.code.as_str(),
        "code_system": component.code_system.as_str(),
        "code_display": component.code_display.as_str(),
    };
    insert_value(&mut doc, &component.value);
    doc
}

fn document_to_component(doc: &Document) -> ObservationComponent {
    ObservationComponent {
        code: str_field(doc, "code"),
        code_system: str_field(doc, "code_system"),
        code_display: str_field(doc, "code_display"),
        value: read_value(doc),
    }
}

/// Builds the stored document. `_id` is never included.
///
/// Timestamps are written only when the record carries them.
pub fn observation_to_document(observation: &Observation) -> Document {
    let mut doc = doc! {
        "patient_id": observation.patient_id.as_str(),
        "status": observation.status.as_str(),
        "category": observation.category.as_str(),
        "code": observation.code.as_str(),
        "code_system": observation.code_system.as_str(),
        "code_display": observation.code_display.as_str(),
    };

    insert_value(&mut doc, &observation.value);

    if let Some(effective) = observation.effective_date {
        doc.insert("effective_date", to_bson_datetime(effective));
    }
    doc.insert("issued_date", to_bson_datetime(observation.issued));

    if !observation.components.is_empty() {
        let components: Vec<Bson> = observation
            .components
            .iter()
            .map(|c| Bson::Document(component_to_document(c)))
            .collect();
        doc.insert("components", components);
    }

    if let Some(created_at) = observation.created_at {
        doc.insert("created_at", to_bson_datetime(created_at));
    }
    if let Some(updated_at) = observation.updated_at {
        doc.insert("updated_at", to_bson_datetime(updated_at));
    }

    doc
}

/// Reads a stored document back into a record.
pub fn document_to_observation(doc: &Document) -> StorageResult<Observation> {
    let id = doc.get_object_id("_id").map_err(|e| {
        StorageError::Backend(BackendError::SerializationError {
            message: format!("observation document without ObjectId: {}", e),
        })
    })?;

    let issued = datetime_field(doc, "issued_date").ok_or_else(|| {
        StorageError::Backend(BackendError::SerializationError {
            message: format!("observation {} has no issued_date", id.to_hex()),
        })
    })?;

    let components = match doc.get_array("components") {
        Ok(items) => items
            .iter()
            .filter_map(Bson::as_document)
            .map(document_to_component)
            .collect(),
        Err(_) => Vec::new(),
    };

    Ok(Observation {
        id: Some(id.to_hex()),
        patient_id: str_field(doc, "patient_id"),
        status: ObservationStatus::from_code(doc.get_str("status").unwrap_or_default()),
        category: str_field(doc, "category"),
        code: str_field(doc, "code"),
        code_system: str_field(doc, "code_system"),
        code_display: str_field(doc, "code_display"),
        value: read_value(doc),
        effective_date: datetime_field(doc, "effective_date"),
        issued,
        components,
        created_at: datetime_field(doc, "created_at"),
        updated_at: datetime_field(doc, "updated_at"),
    })
}
