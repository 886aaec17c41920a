use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use futures::future::join_all;
use uuid::Uuid;

use appointment_cell::models::BookAppointmentRequest;
use appointment_cell::AppointmentBookingService;
use shared_database::{EntityStore, InMemoryStore};
use shared_models::entities::AppointmentStatus;
use shared_models::error::ClinicError;
use shared_utils::test_utils::{future_slot, seed_appointment, seed_doctor, seed_patient};

fn service(store: &Arc<InMemoryStore>) -> AppointmentBookingService {
    AppointmentBookingService::with_store(store.clone())
}

fn request(doctor_id: Uuid, patient_id: Uuid) -> BookAppointmentRequest {
    BookAppointmentRequest {
        doctor_id,
        patient_id,
        scheduled_at: future_slot(),
        reason: Some("Follow-up".to_string()),
    }
}

#[tokio::test]
async fn test_book_appointment_starts_pending() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;

    let appointment = service(&store)
        .book_appointment(request(doctor.id, patient.id))
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.completed_at, None);
    assert_eq!(
        store.get_appointment(appointment.id).await.unwrap(),
        Some(appointment)
    );
}

#[tokio::test]
async fn test_book_with_unknown_participants() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;

    assert_matches!(
        service(&store).book_appointment(request(Uuid::new_v4(), patient.id)).await,
        Err(ClinicError::NotFound(msg)) if msg == "Doctor not found."
    );
    assert_matches!(
        service(&store).book_appointment(request(doctor.id, Uuid::new_v4())).await,
        Err(ClinicError::NotFound(msg)) if msg == "Patient not found."
    );
}

#[tokio::test]
async fn test_past_and_present_times_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;

    for offset in [Duration::zero(), Duration::minutes(-5), Duration::days(-30)] {
        let mut past = request(doctor.id, patient.id);
        past.scheduled_at = Utc::now() + offset;
        assert_matches!(
            service(&store).book_appointment(past).await,
            Err(ClinicError::InvalidState(_))
        );
    }
}

#[tokio::test]
async fn test_same_doctor_same_instant_conflicts() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let first_patient = seed_patient(&*store).await;
    let second_patient = seed_patient(&*store).await;
    let booking = service(&store);

    let first = booking
        .book_appointment(request(doctor.id, first_patient.id))
        .await
        .unwrap();

    let mut clash = request(doctor.id, second_patient.id);
    clash.scheduled_at = first.scheduled_at;
    assert_matches!(
        booking.book_appointment(clash.clone()).await,
        Err(ClinicError::Conflict(_))
    );

    // A different doctor may use the same instant.
    let other_doctor = seed_doctor(&*store).await;
    clash.doctor_id = other_doctor.id;
    assert!(booking.book_appointment(clash).await.is_ok());
}

#[tokio::test]
async fn test_completed_and_approved_slots_conflict() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let booking = service(&store);

    for status in [AppointmentStatus::Approved, AppointmentStatus::Completed] {
        let existing = seed_appointment(&*store, &doctor, &patient, status).await;
        let mut clash = request(doctor.id, patient.id);
        clash.scheduled_at = existing.scheduled_at;
        assert_matches!(booking.book_appointment(clash).await, Err(ClinicError::Conflict(_)));
    }
}

#[tokio::test]
async fn test_rejected_slot_can_be_rebooked() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let rejected = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Rejected).await;

    let mut rebook = request(doctor.id, patient.id);
    rebook.scheduled_at = rejected.scheduled_at;

    assert!(service(&store).book_appointment(rebook).await.is_ok());
}

#[tokio::test]
async fn test_concurrent_bookings_for_one_slot() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let slot = future_slot();

    let mut attempts = Vec::new();
    for _ in 0..6 {
        let patient = seed_patient(&*store).await;
        let booking = service(&store);
        let request = BookAppointmentRequest {
            doctor_id: doctor.id,
            patient_id: patient.id,
            scheduled_at: slot,
            reason: None,
        };
        attempts.push(tokio::spawn(async move { booking.book_appointment(request).await }));
    }

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, ClinicError::Conflict(_))));
}

#[tokio::test]
async fn test_listings_are_most_recent_first() {
    let store = Arc::new(InMemoryStore::new());
    let doctor = seed_doctor(&*store).await;
    let patient = seed_patient(&*store).await;
    let booking = service(&store);

    let earlier = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Pending).await;
    let later = seed_appointment(&*store, &doctor, &patient, AppointmentStatus::Approved).await;

    let for_doctor = booking.get_doctor_appointments(doctor.id).await.unwrap();
    let ids: Vec<_> = for_doctor.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![later.id, earlier.id]);

    let for_patient = booking.get_patient_appointments(patient.id).await.unwrap();
    assert_eq!(for_patient.len(), 2);
    assert_eq!(for_patient[0].id, later.id);
}

#[tokio::test]
async fn test_listings_for_unknown_owner() {
    let store = Arc::new(InMemoryStore::new());
    let booking = service(&store);

    assert_matches!(
        booking.get_doctor_appointments(Uuid::new_v4()).await,
        Err(ClinicError::NotFound(_))
    );
    assert_matches!(
        booking.get_patient_appointments(Uuid::new_v4()).await,
        Err(ClinicError::NotFound(_))
    );
}
