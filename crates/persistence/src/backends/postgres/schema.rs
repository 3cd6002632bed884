//! PostgreSQL schema definitions and migrations.

use crate::error::{BackendError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub async fn initialize_schema(client: &deadpool_postgres::Client) -> StorageResult<()> {
    let current_version = get_schema_version(client).await?;

    if current_version == 0 {
        create_schema_v1(client).await?;
        set_schema_version(client, SCHEMA_VERSION).await?;
        tracing::info!(version = SCHEMA_VERSION, "Created PostgreSQL schema");
    }

    Ok(())
}

async fn get_schema_version(client: &deadpool_postgres::Client) -> StorageResult<i32> {
    client
        .execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER NOT NULL
            )",
            &[],
        )
        .await
        .map_err(|e| migration_error(format!("Failed to create schema_version table: {}", e)))?;

    let row = client
        .query_opt("SELECT version FROM schema_version LIMIT 1", &[])
        .await
        .map_err(|e| migration_error(format!("Failed to query schema version: {}", e)))?;

    Ok(row.map(|r| r.get::<_, i32>(0)).unwrap_or(0))
}

async fn set_schema_version(client: &deadpool_postgres::Client, version: i32) -> StorageResult<()> {
    client
        .execute("DELETE FROM schema_version", &[])
        .await
        .map_err(|e| migration_error(format!("Failed to clear schema_version: {}", e)))?;

    client
        .execute(
            "INSERT INTO schema_version (version) VALUES ($1)",
            &[&version],
        )
        .await
        .map_err(|e| migration_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

async fn create_schema_v1(client: &deadpool_postgres::Client) -> StorageResult<()> {
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS patients (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                identifier_system TEXT,
                identifier_value TEXT,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                family_name TEXT NOT NULL DEFAULT '',
                given_name TEXT NOT NULL DEFAULT '',
                gender TEXT NOT NULL DEFAULT 'unknown',
                birth_date DATE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE INDEX IF NOT EXISTS idx_patients_family_name ON patients(family_name);
            CREATE INDEX IF NOT EXISTS idx_patients_given_name ON patients(given_name);
            CREATE INDEX IF NOT EXISTS idx_patients_birth_date ON patients(birth_date);
            CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);",
        )
        .await
        .map_err(|e| migration_error(format!("Failed to create patients table: {}", e)))
}

fn migration_error(message: String) -> crate::error::StorageError {
    crate::error::StorageError::Backend(BackendError::MigrationError { message })
}
