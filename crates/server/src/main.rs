//! Vitalink server
//!
//! Serves Patient records from SQLite or PostgreSQL and Observation records
//! from MongoDB under `/fhir`.

use clap::Parser;
use tracing::info;
use vitalink_persistence::core::PatientRepository;
use vitalink_rest::{PatientStoreMode, ServerConfig, create_app_with_config, init_logging};

#[cfg(feature = "sqlite")]
use vitalink_persistence::backends::sqlite::{SqliteBackend, SqliteBackendConfig};

/// Creates and initializes a SQLite backend from the server configuration.
#[cfg(feature = "sqlite")]
fn create_sqlite_backend(config: &ServerConfig) -> anyhow::Result<SqliteBackend> {
    let db_path = config.database_url.as_deref().unwrap_or("vitalink.db");
    info!(database = %db_path, "Initializing SQLite backend");

    let backend = if db_path == ":memory:" {
        SqliteBackend::in_memory()?
    } else {
        SqliteBackend::with_config(db_path, SqliteBackendConfig::default())?
    };
    backend.init_schema()?;

    Ok(backend)
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let store_mode = config
        .patient_store_mode()
        .map_err(|e| anyhow::anyhow!("Invalid patient store configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        patient_store = %store_mode,
        mongodb_database = %config.mongodb_database,
        "Starting Vitalink server"
    );

    match store_mode {
        PatientStoreMode::Sqlite => start_sqlite(config).await,
        PatientStoreMode::Postgres => start_postgres(config).await,
    }
}

/// Connects the observation store and serves both stores.
#[cfg(feature = "mongodb")]
async fn start_with_patients<P>(patients: P, config: ServerConfig) -> anyhow::Result<()>
where
    P: PatientRepository + 'static,
{
    use vitalink_persistence::backends::mongodb::{MongoBackend, MongoConfig};

    info!(database = %config.mongodb_database, "Initializing MongoDB backend");
    let observations = MongoBackend::new(MongoConfig {
        uri: config.mongodb_uri.clone(),
        database: config.mongodb_database.clone(),
    })
    .await?;

    let app = create_app_with_config(patients, observations, config.clone());
    serve(app, &config).await
}

/// Fallback when mongodb feature is not enabled.
#[cfg(not(feature = "mongodb"))]
async fn start_with_patients<P>(_patients: P, _config: ServerConfig) -> anyhow::Result<()>
where
    P: PatientRepository + 'static,
{
    anyhow::bail!(
        "Observations are stored in MongoDB, which requires the 'mongodb' feature. \
         Build with: cargo build -p vitalink-server --features mongodb"
    )
}

/// Starts the server with SQLite holding patients.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig) -> anyhow::Result<()> {
    let backend = create_sqlite_backend(&config)?;
    start_with_patients(backend, config).await
}

/// Fallback when sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite patient store requires the 'sqlite' feature. \
         Build with: cargo build -p vitalink-server --features sqlite"
    )
}

/// Starts the server with PostgreSQL holding patients.
#[cfg(feature = "postgres")]
async fn start_postgres(config: ServerConfig) -> anyhow::Result<()> {
    use vitalink_persistence::backends::postgres::PostgresBackend;

    let backend = match config.database_url.as_deref() {
        Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresBackend::from_connection_string(url).await?
        }
        _ => {
            info!("Initializing PostgreSQL backend from environment variables");
            PostgresBackend::from_env().await?
        }
    };

    backend.init_schema().await?;

    start_with_patients(backend, config).await
}

/// Fallback when postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres patient store requires the 'postgres' feature. \
         Build with: cargo build -p vitalink-server --features postgres"
    )
}

#[cfg(not(any(feature = "sqlite", feature = "postgres")))]
compile_error!("At least one patient store feature (sqlite or postgres) must be enabled");
