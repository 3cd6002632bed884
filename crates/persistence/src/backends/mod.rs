//! Database backend implementations.
//!
//! Each backend is gated behind a feature flag.
//!
//! # Available Backends
//!
//! | Backend | Feature | Stores | Description |
//! |---------|---------|--------|-------------|
//! | SQLite | `sqlite` | Patient | Embedded database, in-memory or file |
//! | PostgreSQL | `postgres` | Patient | Pooled RDBMS with native date types |
//! | MongoDB | `mongodb` | Observation | Document store for variable-shape readings |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use vitalink_persistence::backends::sqlite::SqliteBackend;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory SQLite backend
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or use a file-based database
//! let backend = SqliteBackend::open("./data/patients.db")?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "mongodb")]
pub mod mongodb;
