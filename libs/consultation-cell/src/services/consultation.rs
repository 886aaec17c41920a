use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::entities::Consultation;
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::CreateConsultationRequest;

pub struct ConsultationService {
    store: Arc<dyn ClinicStore>,
}

impl ConsultationService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    /// Records the one consultation an approved or completed appointment may have.
    #[instrument(skip(self, request), fields(appointment_id = %request.appointment_id))]
    pub async fn create_consultation(
        &self,
        request: CreateConsultationRequest,
    ) -> ClinicResult<Consultation> {
        let appointment = self
            .store
            .get_appointment(request.appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Appointment"))?;

        if !appointment.status.allows_clinical_records() {
            warn!("Consultation refused for {} appointment", appointment.status);
            return Err(ClinicError::InvalidState(format!(
                "Consultations can only be recorded for approved or completed appointments (current status: {}).",
                appointment.status
            )));
        }

        if self
            .store
            .consultation_for_appointment(appointment.id)
            .await?
            .is_some()
        {
            return Err(ClinicError::Conflict(
                "Consultation already exists for this appointment.".to_string(),
            ));
        }

        let consultation = Consultation {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            diagnosis: request.diagnosis,
            observations: request.observations,
            notes: request.notes,
            test_recommendations: request.test_recommendations,
            created_at: Utc::now(),
        };

        self.store.insert_consultation(consultation.clone()).await?;
        info!("Consultation {} recorded", consultation.id);

        Ok(consultation)
    }

    pub async fn get_for_appointment(&self, appointment_id: Uuid) -> ClinicResult<Consultation> {
        debug!("Fetching consultation for appointment {}", appointment_id);

        self.store
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Appointment"))?;

        self.store
            .consultation_for_appointment(appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Consultation"))
    }
}
