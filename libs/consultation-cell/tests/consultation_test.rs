use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::AppointmentBookingService;
use consultation_cell::models::CreateConsultationRequest;
use consultation_cell::{consultation_routes, ConsultationService};
use shared_database::InMemoryStore;
use shared_models::entities::AppointmentStatus;
use shared_models::error::ClinicError;
use shared_utils::test_utils::{seed_appointment, seed_doctor, seed_patient, TestConfig};

fn request(appointment_id: Uuid) -> CreateConsultationRequest {
    CreateConsultationRequest {
        appointment_id,
        diagnosis: Some("Seasonal allergic rhinitis".to_string()),
        observations: Some("Clear nasal discharge, no fever".to_string()),
        notes: None,
        test_recommendations: Some("Skin prick test".to_string()),
    }
}

#[tokio::test]
async fn test_consultation_follows_appointment_status() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let appointment = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Pending).await;
    let service = ConsultationService::with_store(store.clone());

    assert_matches!(
        service.create_consultation(request(appointment.id)).await,
        Err(ClinicError::InvalidState(_))
    );

    AppointmentBookingService::with_store(store.clone())
        .update_status(appointment.id, AppointmentStatus::Approved)
        .await
        .unwrap();

    let consultation = service.create_consultation(request(appointment.id)).await.unwrap();
    assert_eq!(consultation.appointment_id, appointment.id);

    assert_matches!(
        service.create_consultation(request(appointment.id)).await,
        Err(ClinicError::Conflict(_))
    );

    assert_eq!(
        service.get_for_appointment(appointment.id).await.unwrap(),
        consultation
    );
}

#[tokio::test]
async fn test_rejected_and_completed_appointments() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let service = ConsultationService::with_store(store.clone());

    let rejected = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Rejected).await;
    assert_matches!(
        service.create_consultation(request(rejected.id)).await,
        Err(ClinicError::InvalidState(_))
    );

    let completed = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Completed).await;
    assert!(service.create_consultation(request(completed.id)).await.is_ok());
}

#[tokio::test]
async fn test_unknown_appointment() {
    let store = Arc::new(InMemoryStore::new());
    let service = ConsultationService::with_store(store);

    assert_matches!(
        service.create_consultation(request(Uuid::new_v4())).await,
        Err(ClinicError::NotFound(_))
    );
    assert_matches!(
        service.get_for_appointment(Uuid::new_v4()).await,
        Err(ClinicError::NotFound(_))
    );
}

#[tokio::test]
async fn test_create_route_returns_ok() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let appointment = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Approved).await;
    let app = consultation_routes(TestConfig::default().to_state(store.clone()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "appointment_id": appointment.id, "diagnosis": "Sprained ankle" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/appointment/{}", appointment.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["diagnosis"], "Sprained ankle");
}

#[tokio::test]
async fn test_overlong_notes_rejected_before_service() {
    let store = Arc::new(InMemoryStore::new());
    let app = consultation_routes(TestConfig::default().to_state(store));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "appointment_id": Uuid::new_v4(), "notes": "n".repeat(1001) }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    // Validation runs first, so the unknown appointment is never looked up.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
