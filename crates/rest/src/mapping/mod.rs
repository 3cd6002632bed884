//! Conversion between wire resources and storage records.
//!
//! Every function here is total: fields that cannot be understood are left
//! at their defaults instead of failing the request.

mod observation;
mod patient;

pub use observation::{observation_from_wire, observation_to_wire};
pub use patient::{patient_from_wire, patient_to_wire};
