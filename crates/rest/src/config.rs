//! Server configuration for the Vitalink REST API.
//!
//! Settings come from command line arguments, with environment variable
//! fallbacks, or are built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VITALINK_PORT` | 8080 | Server port |
//! | `VITALINK_HOST` | 127.0.0.1 | Host to bind |
//! | `VITALINK_LOG_LEVEL` | info | Log level |
//! | `VITALINK_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `VITALINK_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `VITALINK_ENABLE_CORS` | true | Enable CORS |
//! | `VITALINK_CORS_ORIGINS` | * | Allowed origins |
//! | `VITALINK_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `VITALINK_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `VITALINK_PATIENT_STORE` | sqlite | Patient store (`sqlite` or `postgres`) |
//! | `VITALINK_DATABASE_URL` | vitalink.db | SQLite path or PostgreSQL URL |
//! | `VITALINK_MONGODB_URI` | mongodb://localhost:27017 | MongoDB connection string |
//! | `VITALINK_MONGODB_DATABASE` | vitalink | MongoDB database name |
//!
//! # Example
//!
//! ```rust
//! use vitalink_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;

/// Relational engine holding Patient records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientStoreMode {
    /// Embedded SQLite database file.
    Sqlite,
    /// PostgreSQL server.
    Postgres,
}

impl FromStr for PatientStoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(PatientStoreMode::Sqlite),
            "postgres" | "postgresql" | "pg" => Ok(PatientStoreMode::Postgres),
            _ => Err(format!(
                "Unknown patient store '{}'. Valid options: sqlite, postgres",
                s
            )),
        }
    }
}

impl fmt::Display for PatientStoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientStoreMode::Sqlite => write!(f, "sqlite"),
            PatientStoreMode::Postgres => write!(f, "postgres"),
        }
    }
}

/// Server configuration for the Vitalink REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "vitalink")]
#[command(about = "Vitalink FHIR Patient/Observation server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "VITALINK_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "VITALINK_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "VITALINK_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "VITALINK_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "VITALINK_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "VITALINK_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "VITALINK_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "VITALINK_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "VITALINK_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Patient store: sqlite or postgres.
    #[arg(long, env = "VITALINK_PATIENT_STORE", default_value = "sqlite")]
    pub patient_store: String,

    /// SQLite database path or PostgreSQL connection string.
    #[arg(long, env = "VITALINK_DATABASE_URL")]
    pub database_url: Option<String>,

    /// MongoDB connection string for observations.
    #[arg(
        long,
        env = "VITALINK_MONGODB_URI",
        default_value = "mongodb://localhost:27017"
    )]
    pub mongodb_uri: String,

    /// MongoDB database name.
    #[arg(long, env = "VITALINK_MONGODB_DATABASE", default_value = "vitalink")]
    pub mongodb_database: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            patient_store: "sqlite".to_string(),
            database_url: None,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "vitalink".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Falls back to defaults when the process arguments do not parse.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured patient store.
    pub fn patient_store_mode(&self) -> Result<PatientStoreMode, String> {
        self.patient_store.parse()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if let Err(e) = self.patient_store_mode() {
            errors.push(e);
        }

        if self.mongodb_database.is_empty() {
            errors.push("MongoDB database name cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables CORS and request IDs.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            ..Default::default()
        }
    }
}
