use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::appointment_routes;
use shared_database::InMemoryStore;
use shared_models::entities::AppointmentStatus;
use shared_utils::test_utils::{future_slot, seed_appointment, seed_doctor, seed_patient, TestConfig};

fn app(store: &Arc<InMemoryStore>) -> Router {
    appointment_routes(TestConfig::default().to_state(store.clone()))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_book_returns_created_pending() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;

    let (status, body) = send(
        app(&store),
        "POST",
        "/",
        Some(json!({
            "doctor_id": doctor.id,
            "patient_id": patient.id,
            "scheduled_at": future_slot(),
            "reason": "Annual review"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["reason"], "Annual review");
}

#[tokio::test]
async fn test_book_in_past_is_bad_request() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;

    let (status, body) = send(
        app(&store),
        "POST",
        "/",
        Some(json!({
            "doctor_id": doctor.id,
            "patient_id": patient.id,
            "scheduled_at": Utc::now() - Duration::hours(2)
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Appointment time must be in the future.");
}

#[tokio::test]
async fn test_double_booking_is_bad_request() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let existing = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Pending).await;

    let (status, body) = send(
        app(&store),
        "POST",
        "/",
        Some(json!({
            "doctor_id": doctor.id,
            "patient_id": patient.id,
            "scheduled_at": existing.scheduled_at
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Doctor already has an appointment at this time.");
}

#[tokio::test]
async fn test_book_for_unknown_doctor_is_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let patient = seed_patient(&*store).await;

    let (status, _) = send(
        app(&store),
        "POST",
        "/",
        Some(json!({
            "doctor_id": Uuid::new_v4(),
            "patient_id": patient.id,
            "scheduled_at": future_slot()
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_status() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let appointment = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Pending).await;
    let uri = format!("/{}/status", appointment.id);

    let (status, body) = send(app(&store), "PATCH", &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());

    let (status, _) = send(app(&store), "PATCH", &uri, Some(json!({ "status": "approved" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app(&store), "PATCH", &uri, Some(json!({ "status": "archived" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_and_list_routes() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let appointment = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Approved).await;

    let (status, body) = send(app(&store), "GET", &format!("/{}", appointment.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = send(app(&store), "GET", &format!("/doctor/{}", doctor.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(app(&store), "GET", &format!("/patient/{}", patient.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], json!(appointment.id));

    let (status, body) = send(app(&store), "GET", &format!("/doctor/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Doctor not found.");
}
