//! FHIR route configuration.

use axum::{Router, routing::get};
use vitalink_persistence::core::{ObservationRepository, PatientRepository};

use crate::handlers;
use crate::state::AppState;

/// Path prefix under which all resource routes are mounted.
pub const FHIR_BASE: &str = "/fhir";

/// Creates all FHIR REST API routes, nested under [`FHIR_BASE`].
///
/// # Routes
///
/// ## Type-level
/// - `GET /fhir/{type}` - Search
/// - `POST /fhir/{type}` - Create
///
/// ## Instance-level
/// - `GET /fhir/{type}/{id}` - Read
/// - `PUT /fhir/{type}/{id}` - Update
/// - `DELETE /fhir/{type}/{id}` - Delete
///
/// `{type}` is `Patient` or `Observation`.
pub fn create_routes<P, O>(state: AppState<P, O>) -> Router
where
    P: PatientRepository + 'static,
    O: ObservationRepository + 'static,
{
    let resources = Router::new()
        // Patient
        .route(
            "/Patient",
            get(handlers::search_patients_handler::<P, O>)
                .post(handlers::create_patient_handler::<P, O>),
        )
        .route(
            "/Patient/{id}",
            get(handlers::read_patient_handler::<P, O>)
                .put(handlers::update_patient_handler::<P, O>)
                .delete(handlers::delete_patient_handler::<P, O>),
        )
        // Observation
        .route(
            "/Observation",
            get(handlers::search_observations_handler::<P, O>)
                .post(handlers::create_observation_handler::<P, O>),
        )
        .route(
            "/Observation/{id}",
            get(handlers::read_observation_handler::<P, O>)
                .put(handlers::update_observation_handler::<P, O>)
                .delete(handlers::delete_observation_handler::<P, O>),
        );

    Router::new()
        .nest(FHIR_BASE, resources)
        .with_state(state)
}

