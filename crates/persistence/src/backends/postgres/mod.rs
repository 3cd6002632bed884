//! PostgreSQL backend implementation.
//!
//! Implements [`PatientRepository`](crate::core::PatientRepository) with
//! connection pooling via deadpool-postgres, native `UUID`, `DATE` and
//! `TIMESTAMPTZ` columns, and `RETURNING` clauses for storage-assigned values.
//!
//! # Example
//!
//! ```no_run
//! use vitalink_persistence::backends::postgres::{PostgresBackend, PostgresConfig};
//!
//! # async fn main_example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = PostgresBackend::new(PostgresConfig::default()).await?;
//! backend.init_schema().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS patients (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     identifier_system TEXT,
//!     identifier_value TEXT,
//!     active BOOLEAN NOT NULL DEFAULT TRUE,
//!     family_name TEXT NOT NULL DEFAULT '',
//!     given_name TEXT NOT NULL DEFAULT '',
//!     gender TEXT NOT NULL DEFAULT 'unknown',
//!     birth_date DATE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

mod backend;
mod schema;
mod storage;

pub use backend::{PostgresBackend, PostgresConfig, PostgresSslMode};
