//! Vitalink Persistence Layer
//!
//! Storage for the two resource kinds the Vitalink aggregator serves:
//! Patients live in a relational store, Observations in a document store.
//! Both sit behind repository traits, and both are searched through
//! compilers that turn FHIR-style query strings into parameterized engine
//! queries.
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! vitalink-persistence = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! Available backend features:
//! - `sqlite` (default) - Patient store, in-memory and file modes
//! - `postgres` - Patient store on PostgreSQL
//! - `mongodb` (default) - Observation store
//!
//! # Architecture
//!
//! - [`types`] - Domain records and search parameters
//! - [`search`] - Query-string parsing and the per-engine search compilers
//! - [`core`] - Repository traits
//! - [`backends`] - Backend implementations
//! - [`error`] - Error types for all operations
//!
//! # Search
//!
//! ```
//! use vitalink_persistence::search::{PatientQueryBuilder, PlaceholderStyle};
//! use vitalink_persistence::types::PatientSearchParams;
//!
//! let params = PatientSearchParams::from_query_string("name=smith&_count=5");
//! assert_eq!(params.name.as_deref(), Some("smith"));
//! assert_eq!(params.limit, 5);
//!
//! let query = PatientQueryBuilder::new(PlaceholderStyle::Dollar).build(&params);
//! assert!(query.sql.contains("LOWER(family_name) LIKE $1"));
//! assert!(query.sql.ends_with("LIMIT $2 OFFSET $3"));
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use types::{Observation, ObservationSearchParams, Patient, PatientSearchParams};

// Re-export core traits
pub use core::{ObservationRepository, PatientRepository};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
