//! SQLite backend implementation.

use std::fmt::Debug;
use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, StorageError, StorageResult};

use super::schema;

/// SQLite backend for Patient storage.
pub struct SqliteBackend {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteBackendConfig,
    is_memory: bool,
}

impl Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteBackendConfig {
    /// Maximum number of connections in the pool.
    ///
    /// Ignored for in-memory databases, which always use a single connection.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode for file databases.
    #[serde(default = "default_true")]
    pub enable_wal: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout_ms() -> u64 {
    30000
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteBackendConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connection_timeout_ms: default_connection_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
        }
    }
}

/// Replaces the built-in `lower()`, which only folds ASCII, with Unicode
/// lowercasing so name patterns built with `str::to_lowercase` match.
fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
}

impl SqliteBackend {
    /// Creates a new in-memory SQLite backend.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_config(":memory:", SqliteBackendConfig::default())
    }

    /// Opens or creates a file-based SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteBackendConfig::default())
    }

    /// Creates a backend with custom configuration.
    pub fn with_config<P: AsRef<Path>>(
        path: P,
        config: SqliteBackendConfig,
    ) -> StorageResult<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let is_memory = path_str == ":memory:";

        let busy_timeout = Duration::from_millis(u64::from(config.busy_timeout_ms));
        let manager = SqliteConnectionManager::file(path.as_ref())
            .with_init(move |conn| {
                conn.busy_timeout(busy_timeout)?;
                register_functions(conn)
            });

        // Every `:memory:` connection is its own database.
        let max_size = if is_memory { 1 } else { config.max_connections.max(1) };

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(Duration::from_millis(config.connection_timeout_ms))
            .build(manager)
            .map_err(|e| {
                StorageError::Backend(BackendError::ConnectionFailed {
                    backend_name: "sqlite".to_string(),
                    message: e.to_string(),
                })
            })?;

        let backend = Self {
            pool,
            config,
            is_memory,
        };

        backend.configure_connection()?;

        tracing::debug!(path = %path_str, max_size, "Opened SQLite pool");

        Ok(backend)
    }

    /// Initialize the database schema.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// Get a connection from the pool.
    pub(crate) fn get_connection(
        &self,
    ) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: e.to_string(),
            })
        })
    }

    fn configure_connection(&self) -> StorageResult<()> {
        if self.config.enable_wal && !self.is_memory {
            let conn = self.get_connection()?;
            // journal_mode returns a row, so it cannot go through execute().
            conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
                .map_err(|e| {
                    StorageError::Backend(BackendError::Internal {
                        backend_name: "sqlite".to_string(),
                        message: format!("Failed to enable WAL mode: {}", e),
                        source: None,
                    })
                })?;
        }

        Ok(())
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &SqliteBackendConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_backend() {
        let backend = SqliteBackend::in_memory().unwrap();
        assert!(backend.is_memory());
        backend.init_schema().unwrap();
    }

    #[test]
    fn test_in_memory_pool_is_single_connection() {
        let backend = SqliteBackend::in_memory().unwrap();
        assert_eq!(backend.pool.max_size(), 1);
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: SqliteBackendConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.busy_timeout_ms, 5000);
        assert!(config.enable_wal);
    }

    #[test]
    fn test_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SqliteBackend::open(dir.path().join("patients.db")).unwrap();
        assert!(!backend.is_memory());
        backend.init_schema().unwrap();
    }

    #[test]
    fn test_lower_folds_non_ascii() {
        let backend = SqliteBackend::in_memory().unwrap();
        let conn = backend.get_connection().unwrap();

        let folded: String = conn
            .query_row("SELECT lower('ÉMILE Ávila')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "émile ávila");

        let null: Option<String> = conn
            .query_row("SELECT lower(NULL)", [], |row| row.get(0))
            .unwrap();
        assert!(null.is_none());
    }
}
