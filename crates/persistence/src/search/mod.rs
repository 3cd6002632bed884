//! Search support: query-string parsing and per-engine search compilers.
//!
//! - [`query_parser`] - query string to structured search parameters
//! - [`sql`] - parameterized SQL fragments shared by the relational backends
//! - [`patient_query`] - Patient search compiled to SQL
//! - [`observation_filter`] - Observation search compiled to a document filter
//!
//! # Data flow
//!
//! ```text
//! ?name=smith&_count=5
//!    └── query_parser  ──► PatientSearchParams
//!          └── PatientQueryBuilder ──► SELECT ... WHERE ... LIMIT ?n OFFSET ?m
//!                └── PatientRepository::search
//! ```

pub mod patient_query;
pub mod query_parser;
pub mod sql;

#[cfg(feature = "mongodb")]
pub mod observation_filter;

pub use patient_query::{PATIENT_COLUMNS, PatientQueryBuilder};
pub use query_parser::{
    DatePrefix, parse_date_with_prefix, parse_observation_params, parse_patient_params,
    parse_search_date,
};
pub use sql::{PlaceholderStyle, SqlFragment, SqlParam};

#[cfg(feature = "mongodb")]
pub use observation_filter::{ObservationFilterBuilder, ObservationQuery};
