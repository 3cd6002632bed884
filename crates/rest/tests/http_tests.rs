//! HTTP-level tests for the `/fhir` routes.
//!
//! Tests the status policy, the Patient name rule, search dispatch and the
//! searchset Bundle shape.

#![cfg(feature = "sqlite")]

mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use vitalink_fhir::FHIR_JSON;

use common::{create, create_test_server, entries, families, patient_json, systolic_json};

// =============================================================================
// Patient CRUD
// =============================================================================

#[tokio::test]
async fn test_create_patient_returns_201() {
    let server = create_test_server();

    let response = server
        .post("/fhir/Patient")
        .json(&patient_json("John", "Smith", "male", "1980-01-15"))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.header("content-type"), FHIR_JSON);
    assert!(response.headers().get("x-request-id").is_none());

    let body = response.json::<Value>();
    assert_eq!(body["resourceType"], "Patient");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(body["active"], true);
    assert_eq!(body["name"][0]["family"], "Smith");
    assert_eq!(body["birthDate"], "1980-01-15");
}

#[tokio::test]
async fn test_create_patient_keeps_explicit_inactive() {
    let server = create_test_server();

    let body = create(
        &server,
        "/fhir/Patient",
        &json!({"resourceType": "Patient", "active": false, "name": [{"given": ["Ann"]}]}),
    )
    .await;

    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn test_create_patient_without_name_is_400() {
    let server = create_test_server();

    for body in [
        json!({"resourceType": "Patient"}),
        json!({"resourceType": "Patient", "name": []}),
        json!({"resourceType": "Patient", "name": [{"family": "", "given": [""]}]}),
    ] {
        let response = server.post("/fhir/Patient").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["resourceType"], "OperationOutcome");
    }
}

#[tokio::test]
async fn test_create_rejects_bad_bodies() {
    let server = create_test_server();

    server
        .post("/fhir/Patient")
        .bytes("{not json".into())
        .content_type("application/json")
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/fhir/Patient")
        .json(&json!({"resourceType": "Observation", "status": "final"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/fhir/Patient")
        .text("<Patient/>")
        .await
        .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_read_patient() {
    let server = create_test_server();
    let created = create(
        &server,
        "/fhir/Patient",
        &patient_json("Jane", "Doe", "female", "1990-05-01"),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = server.get(&format!("/fhir/Patient/{}", id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), created);
}

#[tokio::test]
async fn test_read_missing_patient_is_404() {
    let server = create_test_server();

    let response = server.get("/fhir/Patient/does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let outcome = response.json::<Value>();
    assert_eq!(outcome["resourceType"], "OperationOutcome");
    assert_eq!(outcome["issue"][0]["code"], "not-found");
}

#[tokio::test]
async fn test_update_patient() {
    let server = create_test_server();
    let created = create(
        &server,
        "/fhir/Patient",
        &patient_json("John", "Smith", "male", "1980-01-15"),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/fhir/Patient/{}", id))
        .json(&json!({
            "resourceType": "Patient",
            "id": id,
            "active": true,
            "name": [{"family": "Smythe", "given": ["John"]}],
            "gender": "male"
        }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["id"], id);
    assert_eq!(body["name"][0]["family"], "Smythe");
    assert!(body.get("birthDate").is_none());
}

#[tokio::test]
async fn test_update_patient_id_mismatch_is_400() {
    let server = create_test_server();
    let created = create(
        &server,
        "/fhir/Patient",
        &patient_json("John", "Smith", "male", "1980-01-15"),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let mut body = patient_json("John", "Smith", "male", "1980-01-15");
    body["id"] = json!("someone-else");

    server
        .put(&format!("/fhir/Patient/{}", id))
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_missing_patient_is_404() {
    let server = create_test_server();

    server
        .put("/fhir/Patient/missing")
        .json(&patient_json("John", "Smith", "male", "1980-01-15"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_patient() {
    let server = create_test_server();
    let created = create(
        &server,
        "/fhir/Patient",
        &patient_json("John", "Smith", "male", "1980-01-15"),
    )
    .await;
    let path = format!("/fhir/Patient/{}", created["id"].as_str().unwrap());

    server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&path)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// Patient search
// =============================================================================

async fn seed_patients(server: &axum_test::TestServer) {
    for (given, family, gender, birth) in [
        ("John", "Smith", "male", "1980-01-15"),
        ("Jane", "Smithson", "female", "1992-06-30"),
        ("Bob", "Jones", "male", "2001-11-02"),
    ] {
        create(server, "/fhir/Patient", &patient_json(given, family, gender, birth)).await;
    }
}

#[tokio::test]
async fn test_search_returns_searchset_bundle() {
    let server = create_test_server();
    seed_patients(&server).await;

    let response = server.get("/fhir/Patient?name=smith&_sort=name").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), FHIR_JSON);

    let bundle = response.json::<Value>();
    assert_eq!(bundle["resourceType"], "Bundle");
    assert_eq!(bundle["type"], "searchset");
    assert_eq!(bundle["total"], 2);
    assert_eq!(families(&bundle), vec!["Smith", "Smithson"]);
}

#[tokio::test]
async fn test_search_birthdate_sort_and_count() {
    let server = create_test_server();
    seed_patients(&server).await;

    let bundle = server
        .get("/fhir/Patient?birthdate=ge1990-01-01&_sort=-name&_count=5")
        .await
        .json::<Value>();

    assert_eq!(families(&bundle), vec!["Smithson", "Jones"]);
    assert_eq!(bundle["total"], 2);
}

#[tokio::test]
async fn test_list_without_criteria_pages() {
    let server = create_test_server();
    seed_patients(&server).await;

    let bundle = server.get("/fhir/Patient").await.json::<Value>();
    assert_eq!(bundle["total"], 3);

    let bundle = server
        .get("/fhir/Patient?_count=2&_offset=2")
        .await
        .json::<Value>();
    assert_eq!(bundle["total"], 1);
}

#[tokio::test]
async fn test_search_without_matches_is_empty_bundle() {
    let server = create_test_server();
    seed_patients(&server).await;

    let bundle = server
        .get("/fhir/Patient?family=nobody")
        .await
        .json::<Value>();
    assert_eq!(bundle["total"], 0);
    assert!(entries(&bundle).is_empty());
}

// =============================================================================
// Observation
// =============================================================================

#[tokio::test]
async fn test_observation_crud() {
    let server = create_test_server();

    let created = create(
        &server,
        "/fhir/Observation",
        &systolic_json("abc", 120.0, "2024-03-01T08:05:00Z"),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["subject"]["reference"], "Patient/abc");
    assert_eq!(created["valueQuantity"]["value"], 120.0);
    assert_eq!(created["issued"], "2024-03-01T08:05:00Z");

    let path = format!("/fhir/Observation/{}", id);
    server.get(&path).await.assert_status_ok();

    let mut replacement = systolic_json("abc", 125.0, "2024-03-01T08:05:00Z");
    replacement["status"] = json!("amended");
    let updated = server.put(&path).json(&replacement).await;
    updated.assert_status_ok();
    let updated = updated.json::<Value>();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["status"], "amended");
    assert_eq!(updated["valueQuantity"]["value"], 125.0);

    server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_observation_unknown_status_is_final() {
    let server = create_test_server();

    let mut body = systolic_json("abc", 120.0, "2024-03-01T08:05:00Z");
    body["status"] = json!("bogus");

    let created = create(&server, "/fhir/Observation", &body).await;
    assert_eq!(created["status"], "final");
}

#[tokio::test]
async fn test_observation_id_mismatch_is_400() {
    let server = create_test_server();

    let mut body = systolic_json("abc", 120.0, "2024-03-01T08:05:00Z");
    body["id"] = json!("other");

    server
        .put("/fhir/Observation/000000000000000000000001")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_observation_search_dispatch() {
    let server = create_test_server();

    create(
        &server,
        "/fhir/Observation",
        &systolic_json("abc", 120.0, "2024-03-01T08:05:00Z"),
    )
    .await;
    create(
        &server,
        "/fhir/Observation",
        &systolic_json("abc", 130.0, "2024-03-02T08:05:00Z"),
    )
    .await;
    create(
        &server,
        "/fhir/Observation",
        &systolic_json("xyz", 110.0, "2024-03-03T08:05:00Z"),
    )
    .await;

    // Patient only: listing for that patient, newest first
    let bundle = server
        .get("/fhir/Observation?patient=Patient/abc")
        .await
        .json::<Value>();
    let found = entries(&bundle);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["valueQuantity"]["value"], 130.0);

    // Patient plus code: full search
    let bundle = server
        .get("/fhir/Observation?patient=Patient/abc&code=8480-6&_count=1")
        .await
        .json::<Value>();
    assert_eq!(bundle["total"], 1);
    assert_eq!(entries(&bundle)[0]["subject"]["reference"], "Patient/abc");

    // No criteria: everything
    let bundle = server.get("/fhir/Observation").await.json::<Value>();
    assert_eq!(bundle["total"], 3);
}
