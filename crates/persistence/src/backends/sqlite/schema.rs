//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        tracing::info!(version = SCHEMA_VERSION, "Created SQLite schema");
    }

    Ok(())
}

/// Get the current schema version.
pub fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| migration_error("create schema_version table", e))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| migration_error("clear schema_version", e))?;

    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| migration_error("set schema_version", e))?;

    Ok(())
}

/// Dates are ISO-8601 text so range predicates compare lexically.
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS patients (
            id TEXT PRIMARY KEY,
            identifier_system TEXT,
            identifier_value TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            family_name TEXT NOT NULL DEFAULT '',
            given_name TEXT NOT NULL DEFAULT '',
            gender TEXT NOT NULL DEFAULT 'unknown',
            birth_date TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_patients_family_name ON patients(family_name);
        CREATE INDEX IF NOT EXISTS idx_patients_given_name ON patients(given_name);
        CREATE INDEX IF NOT EXISTS idx_patients_birth_date ON patients(birth_date);
        CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);",
    )
    .map_err(|e| migration_error("create patients table", e))
}

fn migration_error(step: &str, e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::MigrationError {
        message: format!("Failed to {}: {}", step, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
