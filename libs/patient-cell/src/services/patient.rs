use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::entities::Patient;
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::{CreatePatientRequest, UpdatePatientRequest};

pub struct PatientService {
    store: Arc<dyn ClinicStore>,
}

impl PatientService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> ClinicResult<Patient> {
        debug!("Creating new patient profile for: {}", request.email);

        // Check if patient with email already exists
        self.ensure_email_available(&request.email, None).await?;

        let patient = Patient {
            id: Uuid::new_v4(),
            full_name: request.full_name,
            email: request.email,
            phone_number: request.phone_number,
            date_of_birth: request.date_of_birth,
            created_at: Utc::now(),
        };

        self.store.insert_patient(patient.clone()).await?;
        info!("Patient profile created successfully with ID: {}", patient.id);

        Ok(patient)
    }

    pub async fn get_patient(&self, patient_id: Uuid) -> ClinicResult<Patient> {
        debug!("Fetching patient profile: {}", patient_id);

        self.store
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Patient"))
    }

    pub async fn list_patients(&self) -> ClinicResult<Vec<Patient>> {
        let mut patients = self.store.list_patients().await?;
        patients.sort_by(|a, b| a.full_name.to_lowercase().cmp(&b.full_name.to_lowercase()));
        Ok(patients)
    }

    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> ClinicResult<Patient> {
        debug!("Updating patient profile: {}", patient_id);

        let mut patient = self.get_patient(patient_id).await?;

        if let Some(full_name) = request.full_name {
            patient.full_name = full_name;
        }
        if let Some(email) = request.email {
            self.ensure_email_available(&email, Some(patient_id)).await?;
            patient.email = email;
        }
        if let Some(phone_number) = request.phone_number {
            patient.phone_number = Some(phone_number);
        }
        if let Some(date_of_birth) = request.date_of_birth {
            patient.date_of_birth = date_of_birth;
        }

        self.store.update_patient(patient.clone()).await?;
        info!("Patient profile {} updated", patient_id);

        Ok(patient)
    }

    async fn ensure_email_available(&self, email: &str, except: Option<Uuid>) -> ClinicResult<()> {
        match self.store.find_patient_by_email(email).await? {
            Some(existing) if Some(existing.id) != except => Err(ClinicError::Conflict(format!(
                "Patient with email {} already exists",
                email
            ))),
            _ => Ok(()),
        }
    }
}
