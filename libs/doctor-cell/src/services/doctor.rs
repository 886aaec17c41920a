use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::entities::Doctor;
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};

pub struct DoctorService {
    store: Arc<dyn ClinicStore>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// Create a new doctor profile
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> ClinicResult<Doctor> {
        debug!("Creating new doctor profile: {}", request.full_name);

        let doctor = Doctor {
            id: Uuid::new_v4(),
            full_name: request.full_name,
            specialization: request.specialization,
            email: request.email,
            phone_number: request.phone_number,
            created_at: Utc::now(),
        };

        self.store.insert_doctor(doctor.clone()).await?;
        info!("Doctor profile created with ID: {}", doctor.id);

        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> ClinicResult<Doctor> {
        self.store
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Doctor"))
    }

    /// All doctors, ordered by name.
    pub async fn list_doctors(&self) -> ClinicResult<Vec<Doctor>> {
        let mut doctors = self.store.list_doctors().await?;
        doctors.sort_by(|a, b| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()));
        Ok(doctors)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> ClinicResult<Doctor> {
        debug!("Updating doctor profile: {}", doctor_id);

        let mut doctor = self.get_doctor(doctor_id).await?;

        if let Some(full_name) = request.full_name {
            doctor.full_name = full_name;
        }
        if let Some(specialization) = request.specialization {
            doctor.specialization = specialization;
        }
        if request.email.is_some() {
            doctor.email = request.email;
        }
        if request.phone_number.is_some() {
            doctor.phone_number = request.phone_number;
        }

        self.store.update_doctor(doctor.clone()).await?;
        info!("Doctor profile {} updated", doctor_id);

        Ok(doctor)
    }
}
