// libs/appointment-cell/src/services/booking.rs
use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::entities::{Appointment, AppointmentStatus};
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::BookAppointmentRequest;
use crate::services::conflict::ConflictDetectionService;
use crate::services::lifecycle::{validate_appointment_timing, AppointmentLifecycleService};

pub struct AppointmentBookingService {
    store: Arc<dyn ClinicStore>,
    conflict_service: ConflictDetectionService,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn ClinicStore>) -> Self {
        Self {
            conflict_service: ConflictDetectionService::new(store.clone()),
            lifecycle_service: AppointmentLifecycleService::new(store.clone()),
            store,
        }
    }

    pub fn lifecycle(&self) -> &AppointmentLifecycleService {
        &self.lifecycle_service
    }

    #[instrument(skip(self, request), fields(doctor_id = %request.doctor_id, patient_id = %request.patient_id))]
    pub async fn book_appointment(&self, request: BookAppointmentRequest) -> ClinicResult<Appointment> {
        debug!("Booking appointment at {}", request.scheduled_at);

        self.store
            .get_doctor(request.doctor_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Doctor"))?;
        self.store
            .get_patient(request.patient_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Patient"))?;

        validate_appointment_timing(request.scheduled_at, Utc::now())?;

        self.conflict_service
            .ensure_slot_free(request.doctor_id, request.scheduled_at)
            .await?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            scheduled_at: request.scheduled_at,
            reason: request.reason,
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };

        // The store re-checks the slot under its lock, so a concurrent booking
        // that passed the check above still ends in a conflict here.
        self.store.insert_appointment(appointment.clone()).await?;

        info!("Appointment {} booked", appointment.id);
        Ok(appointment)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> ClinicResult<Appointment> {
        self.store
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Appointment"))
    }

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> ClinicResult<Appointment> {
        self.lifecycle_service.update_status(appointment_id, new_status).await
    }

    /// Most recent first.
    pub async fn get_doctor_appointments(&self, doctor_id: Uuid) -> ClinicResult<Vec<Appointment>> {
        self.store
            .get_doctor(doctor_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Doctor"))?;

        let mut appointments = self.store.appointments_for_doctor(doctor_id).await?;
        appointments.sort_by_key(|a| Reverse(a.scheduled_at));
        Ok(appointments)
    }

    /// Most recent first.
    pub async fn get_patient_appointments(&self, patient_id: Uuid) -> ClinicResult<Vec<Appointment>> {
        self.store
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Patient"))?;

        let mut appointments = self.store.appointments_for_patient(patient_id).await?;
        appointments.sort_by_key(|a| Reverse(a.scheduled_at));
        Ok(appointments)
    }
}
