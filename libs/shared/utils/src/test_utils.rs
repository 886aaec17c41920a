use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{EntityStore, InMemoryStore};
use shared_models::entities::{Appointment, AppointmentStatus, Doctor, Medicine, Patient};

use crate::state::AppState;

static SLOT_OFFSET: AtomicI64 = AtomicI64::new(0);

pub struct TestConfig {
    pub clinic_name: String,
    pub currency: String,
    pub low_stock_webhook_url: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            clinic_name: "Test Clinic".to_string(),
            currency: "EUR".to_string(),
            low_stock_webhook_url: None,
        }
    }
}

impl TestConfig {
    pub fn with_webhook(url: &str) -> Self {
        Self {
            low_stock_webhook_url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            clinic_name: self.clinic_name.clone(),
            currency: self.currency.clone(),
            low_stock_webhook_url: self.low_stock_webhook_url.clone(),
            low_stock_webhook_timeout_secs: 2,
            ..AppConfig::default()
        }
    }

    /// State backed by the given store, so tests can seed and inspect rows.
    pub fn to_state(&self, store: Arc<InMemoryStore>) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config(), store))
    }
}

/// A distinct instant in the future for every call, so seeded appointments
/// never collide on a doctor's slot.
pub fn future_slot() -> DateTime<Utc> {
    let offset = SLOT_OFFSET.fetch_add(1, Ordering::SeqCst);
    Utc::now() + Duration::days(1) + Duration::minutes(15 * offset)
}

pub fn test_patient(full_name: &str, email: &str) -> Patient {
    Patient {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        email: email.to_string(),
        phone_number: Some("+353 1 555 0100".to_string()),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 6, 21).unwrap_or_default(),
        created_at: Utc::now(),
    }
}

pub fn test_doctor(full_name: &str, specialization: &str) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        specialization: specialization.to_string(),
        email: Some(format!("{}@clinic.test", Uuid::new_v4().simple())),
        phone_number: None,
        created_at: Utc::now(),
    }
}

pub fn test_medicine(name: &str, quantity: i32, minimum_threshold: i32) -> Medicine {
    Medicine {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        quantity,
        minimum_threshold,
        unit: Some("tablet".to_string()),
        price_per_unit: Decimal::new(125, 2),
        is_active: true,
        created_at: Utc::now(),
    }
}

pub async fn seed_patient<S: EntityStore + ?Sized>(store: &S) -> Patient {
    let email = format!("patient-{}@example.com", Uuid::new_v4().simple());
    let patient = test_patient("Siobhan Kelly", &email);
    store
        .insert_patient(patient.clone())
        .await
        .expect("seeding patient");
    patient
}

pub async fn seed_doctor<S: EntityStore + ?Sized>(store: &S) -> Doctor {
    let doctor = test_doctor("Dr. Ciaran Walsh", "General Practice");
    store
        .insert_doctor(doctor.clone())
        .await
        .expect("seeding doctor");
    doctor
}

pub async fn seed_medicine<S: EntityStore + ?Sized>(
    store: &S,
    name: &str,
    quantity: i32,
    minimum_threshold: i32,
) -> Medicine {
    let medicine = test_medicine(name, quantity, minimum_threshold);
    store
        .insert_medicine(medicine.clone())
        .await
        .expect("seeding medicine");
    medicine
}

pub async fn seed_appointment<S: EntityStore + ?Sized>(
    store: &S,
    doctor: &Doctor,
    patient: &Patient,
    status: AppointmentStatus,
) -> Appointment {
    let appointment = Appointment {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        patient_id: patient.id,
        scheduled_at: future_slot(),
        reason: Some("Routine check-up".to_string()),
        status,
        created_at: Utc::now(),
        completed_at: None,
    };
    store
        .insert_appointment(appointment.clone())
        .await
        .expect("seeding appointment");
    appointment
}
