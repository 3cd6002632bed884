//! # vitalink-rest - FHIR-shaped REST API for Patient and Observation
//!
//! This crate exposes the Vitalink aggregator over HTTP. Patient records live
//! in a relational store (SQLite or PostgreSQL) and Observation records in a
//! document store (MongoDB). Both are reached through the repository traits of
//! `vitalink-persistence`, so the router is generic over the two backends.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitalink_persistence::backends::mongodb::{MongoBackend, MongoConfig};
//! use vitalink_persistence::backends::sqlite::SqliteBackend;
//! use vitalink_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let patients = SqliteBackend::open("vitalink.db")?;
//!     patients.init_schema()?;
//!     let observations = MongoBackend::new(MongoConfig::default()).await?;
//!
//!     let app = create_app_with_config(patients, observations, ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | read | GET | `/fhir/[type]/[id]` |
//! | update | PUT | `/fhir/[type]/[id]` |
//! | delete | DELETE | `/fhir/[type]/[id]` |
//! | create | POST | `/fhir/[type]` |
//! | search | GET | `/fhir/[type]?params` |
//!
//! `[type]` is `Patient` or `Observation`.
//!
//! ## Error Handling
//!
//! All errors are returned as FHIR [OperationOutcome](https://hl7.org/fhir/operationoutcome.html)
//! resources:
//!
//! | HTTP Status | FHIR Issue Code | Description |
//! |-------------|-----------------|-------------|
//! | 400 | invalid | Bad request / validation error |
//! | 404 | not-found | Resource not found |
//! | 415 | not-supported | Unsupported media type |
//! | 500 | exception | Storage failure |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and OperationOutcome generation
//! - [`extractors`] - Typed FHIR body extractor
//! - [`mapping`] - Wire resource <-> storage record conversion
//! - [`services`] - Patient and Observation use cases
//! - [`handlers`] - HTTP request handlers for each interaction
//! - [`responses`] - Response formatting
//! - [`routing`] - Route configuration
//! - [`state`] - Application state

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mapping;
pub mod responses;
pub mod routing;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::{PatientStoreMode, ServerConfig};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use vitalink_persistence::core::{ObservationRepository, PatientRepository};

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<P, O>(patients: P, observations: O) -> Router
where
    P: PatientRepository + 'static,
    O: ObservationRepository + 'static,
{
    create_app_with_config(patients, observations, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the `/fhir` routes and the middleware stack: tracing, request
/// timeout, body size limit, and optionally CORS.
pub fn create_app_with_config<P, O>(patients: P, observations: O, config: ServerConfig) -> Router
where
    P: PatientRepository + 'static,
    O: ObservationRepository + 'static,
{
    info!(
        patient_backend = patients.backend_name(),
        observation_backend = observations.backend_name(),
        "Creating REST API server"
    );

    let state = AppState::new(Arc::new(patients), Arc::new(observations));

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = router.layer(DefaultBodyLimit::max(config.max_body_size));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vitalink_rest={level},vitalink_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
