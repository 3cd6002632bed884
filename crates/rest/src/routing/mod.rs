//! Route configuration for the FHIR REST API.

pub mod fhir_routes;

pub use fhir_routes::{FHIR_BASE, create_routes};
