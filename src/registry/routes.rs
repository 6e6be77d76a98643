use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use super::domain::ApplicantDraft;
use super::store::{ApplicantStore, StoreError};

/// Router builder exposing the registry endpoints for the submission form
/// and the admin dashboard.
pub fn registry_router<S>(store: Arc<S>) -> Router
where
    S: ApplicantStore + 'static,
{
    Router::new()
        .route(
            "/api/applicants",
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            "/api/applicants/:id",
            get(get_handler::<S>).delete(delete_handler::<S>),
        )
        .route("/api/health", get(health_handler))
        .with_state(store)
}

pub(crate) async fn list_handler<S>(State(store): State<Arc<S>>) -> Response
where
    S: ApplicantStore + 'static,
{
    match store.list().await {
        Ok(applicants) => (StatusCode::OK, Json(applicants)).into_response(),
        Err(err) => store_failure("Error fetching applicants", &err),
    }
}

pub(crate) async fn create_handler<S>(
    State(store): State<Arc<S>>,
    Json(draft): Json<ApplicantDraft>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match store.create(draft).await {
        Ok(applicant) => {
            let payload = json!({
                "message": "Application submitted successfully",
                "applicant": applicant,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(StoreError::Invalid(err)) => {
            let payload = json!({ "message": err.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(StoreError::DuplicateEmail) => {
            let payload = json!({ "message": "Email already registered" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(err) => store_failure("Error creating applicant", &err),
    }
}

pub(crate) async fn get_handler<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match store.get(&id).await {
        Ok(applicant) => (StatusCode::OK, Json(applicant)).into_response(),
        Err(StoreError::NotFound) => not_found(),
        Err(err) => store_failure("Error fetching applicant", &err),
    }
}

pub(crate) async fn delete_handler<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Response
where
    S: ApplicantStore + 'static,
{
    match store.delete(&id).await {
        Ok(()) => {
            let payload = json!({ "message": "Applicant deleted successfully" });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(StoreError::NotFound) => not_found(),
        Err(err) => store_failure("Error deleting applicant", &err),
    }
}

pub(crate) async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn not_found() -> Response {
    let payload = json!({ "message": "Applicant not found" });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

/// Log the cause, answer with a generic message; storage internals never
/// reach the caller.
fn store_failure(message: &str, err: &StoreError) -> Response {
    error!(error = %err, "registry store failure");
    let payload = json!({ "message": message });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn health_reports_running_with_timestamp() {
        let Json(body) = health_handler().await;
        assert_eq!(body["message"], "Server is running");
        let timestamp = body["timestamp"].as_str().expect("timestamp present");
        DateTime::parse_from_rfc3339(timestamp).expect("timestamp is RFC 3339");
    }
}
