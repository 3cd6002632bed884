//! SQLite backend implementation.
//!
//! Implements [`PatientRepository`](crate::core::PatientRepository) over a
//! single `patients` table. Supports both in-memory databases (for tests and
//! local development) and file-based databases.
//!
//! # Example
//!
//! ```no_run
//! use vitalink_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE patients (
//!     id TEXT PRIMARY KEY,          -- UUID v4
//!     identifier_system TEXT,
//!     identifier_value TEXT,
//!     active INTEGER NOT NULL DEFAULT 1,
//!     family_name TEXT NOT NULL DEFAULT '',
//!     given_name TEXT NOT NULL DEFAULT '',
//!     gender TEXT NOT NULL DEFAULT 'unknown',
//!     birth_date TEXT,              -- YYYY-MM-DD
//!     created_at TEXT NOT NULL,     -- RFC 3339, microseconds, UTC
//!     updated_at TEXT NOT NULL
//! );
//! ```

mod backend;
mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
