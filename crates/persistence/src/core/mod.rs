//! Core storage traits.
//!
//! - [`PatientRepository`] - Patient CRUD + search, relational engines
//! - [`ObservationRepository`] - Observation CRUD + search, document engine

mod repository;

pub use repository::{ObservationRepository, PatientRepository};
