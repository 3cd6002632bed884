//! # vitalink-fhir
//!
//! Wire models for the FHIR R4 resources exchanged by the Vitalink server:
//! [`Patient`], [`Observation`] and the searchset [`Bundle`].
//!
//! These types mirror the JSON shape only. Every element is an `Option` so that
//! "absent", "empty" and "explicitly false" stay distinguishable after decoding.
//! Conversion to storage records lives in `vitalink-rest`.

pub mod bundle;
pub mod datatypes;
pub mod observation;
pub mod patient;
pub mod resource;

pub use bundle::{Bundle, BundleEntry};
pub use datatypes::{CodeableConcept, Coding, HumanName, Identifier, Quantity, Reference};
pub use observation::{Observation, ObservationComponent};
pub use patient::Patient;
pub use resource::Resource;

/// Media type for FHIR JSON payloads.
pub const FHIR_JSON: &str = "application/fhir+json";
