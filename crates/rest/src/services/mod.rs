//! Use-case layer between the HTTP handlers and the repositories.
//!
//! Each operation maps the wire resource to a storage record, makes one
//! repository call and maps the result back. Storage errors pass through
//! unchanged.

mod observation;
mod patient;

pub use observation::ObservationService;
pub use patient::PatientService;
