//! MongoDB backend implementation.
//!
//! Implements [`ObservationRepository`](crate::core::ObservationRepository)
//! over the `observations` collection. Observations vary in shape (single
//! value, text, multi-component panels), so each one is a single document.
//!
//! # Document layout
//!
//! ```text
//! {
//!   _id: ObjectId,
//!   patient_id, status, category, code, code_system, code_display: string,
//!   value_quantity?: double, value_unit?: string, value_string?: string,
//!   effective_date?: date, issued_date: date,
//!   components?: [{ code, code_system, code_display, value_* }],
//!   created_at: date, updated_at: date
//! }
//! ```

mod backend;
mod document;

pub use backend::{MongoBackend, MongoConfig, OBSERVATIONS_COLLECTION};
pub use document::{document_to_observation, observation_to_document};
