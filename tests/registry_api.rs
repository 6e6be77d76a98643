use applicant_registry::registry::{
    registry_router, Applicant, ApplicantDraft, ApplicantStore, SqliteStore, StoreError,
};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Store whose backing database is gone, for exercising the server-error
/// mapping.
struct UnreachableStore;

#[async_trait]
impl ApplicantStore for UnreachableStore {
    async fn create(&self, _draft: ApplicantDraft) -> Result<Applicant, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }

    async fn get(&self, _id: &str) -> Result<Applicant, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }

    async fn list(&self) -> Result<Vec<Applicant>, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolClosed))
    }
}

async fn test_router() -> Router {
    let store = SqliteStore::in_memory().await.expect("in-memory store opens");
    registry_router(Arc::new(store))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request is handled");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, body)
}

fn post_applicant(payload: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/applicants")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn ana() -> Value {
    json!({
        "name": "Ana",
        "email": "Ana@Example.com",
        "phone": "555-0100",
        "type": "intern",
        "skills": "Python",
        "motivation": "Learn",
    })
}

#[tokio::test]
async fn health_reports_server_running() {
    let app = test_router().await;
    let (status, body) = send(&app, get_request("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Server is running");
    let timestamp = body["timestamp"].as_str().expect("timestamp present");
    DateTime::parse_from_rfc3339(timestamp).expect("timestamp is RFC 3339");
}

#[tokio::test]
async fn listing_an_empty_registry_returns_an_empty_array() {
    let app = test_router().await;
    let (status, body) = send(&app, get_request("/api/applicants")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn submission_returns_created_record_with_normalized_email() {
    let app = test_router().await;
    let (status, body) = send(&app, post_applicant(&ana())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Application submitted successfully");

    let applicant = &body["applicant"];
    assert_eq!(applicant["name"], "Ana");
    assert_eq!(applicant["email"], "ana@example.com");
    assert_eq!(applicant["type"], "intern");
    assert_eq!(applicant["experience"], "");
    assert!(!applicant["id"].as_str().expect("id assigned").is_empty());
    let applied_at = applicant["appliedAt"].as_str().expect("appliedAt assigned");
    DateTime::parse_from_rfc3339(applied_at).expect("appliedAt is RFC 3339");
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let app = test_router().await;
    let (status, _) = send(&app, post_applicant(&ana())).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut second = ana();
    second["name"] = json!("Ana Maria");
    second["email"] = json!("ANA@EXAMPLE.COM");
    let (status, body) = send(&app, post_applicant(&second)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    let (_, listing) = send(&app, get_request("/api/applicants")).await;
    let records = listing.as_array().expect("listing is an array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["email"], "ana@example.com");
}

#[tokio::test]
async fn missing_motivation_creates_nothing() {
    let app = test_router().await;
    let mut payload = ana();
    payload
        .as_object_mut()
        .expect("payload is an object")
        .remove("motivation");

    let (status, body) = send(&app, post_applicant(&payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "motivation is required");

    let (_, listing) = send(&app, get_request("/api/applicants")).await;
    assert_eq!(listing, json!([]));
}

#[tokio::test]
async fn unrecognized_type_is_a_client_error() {
    let app = test_router().await;
    let mut payload = ana();
    payload["type"] = json!("contractor");

    let (status, body) = send(&app, post_applicant(&payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "type must be either \"intern\" or \"volunteer\"");
}

#[tokio::test]
async fn listing_orders_newest_application_first() {
    let app = test_router().await;
    for email in ["a@x.com", "b@x.com", "c@x.com"] {
        let mut payload = ana();
        payload["email"] = json!(email);
        let (status, _) = send(&app, post_applicant(&payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get_request("/api/applicants")).await;
    assert_eq!(status, StatusCode::OK);

    let emails: Vec<&str> = body
        .as_array()
        .expect("listing is an array")
        .iter()
        .map(|record| record["email"].as_str().expect("email present"))
        .collect();
    assert_eq!(emails, vec!["c@x.com", "b@x.com", "a@x.com"]);
}

#[tokio::test]
async fn fetch_and_delete_round_trip() {
    let app = test_router().await;
    let (_, created) = send(&app, post_applicant(&ana())).await;
    let id = created["applicant"]["id"]
        .as_str()
        .expect("id assigned")
        .to_string();

    let (status, fetched) = send(&app, get_request(&format!("/api/applicants/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["email"], "ana@example.com");

    let (status, body) = send(&app, delete_request(&format!("/api/applicants/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Applicant deleted successfully");

    let (status, body) = send(&app, get_request(&format!("/api/applicants/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Applicant not found");
}

#[tokio::test]
async fn store_outage_answers_with_generic_server_errors() {
    let app = registry_router(Arc::new(UnreachableStore));

    // Exact-body assertions: only the generic message, no storage detail.
    let (status, body) = send(&app, get_request("/api/applicants")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error fetching applicants" }));

    let (status, body) = send(&app, post_applicant(&ana())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error creating applicant" }));

    let (status, body) = send(&app, get_request("/api/applicants/some-id")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error fetching applicant" }));

    let (status, body) = send(&app, delete_request("/api/applicants/some-id")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error deleting applicant" }));
}

#[tokio::test]
async fn deleting_an_unknown_id_is_not_found() {
    let app = test_router().await;
    let (status, body) = send(&app, delete_request("/api/applicants/no-such-id")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Applicant not found");
}
