//! Axum extractors for FHIR-specific data.
//!
//! - [`FhirResource`] - Decode and check a typed FHIR resource body

mod fhir_resource;

pub use fhir_resource::{FhirResource, FhirResourceRejection};
