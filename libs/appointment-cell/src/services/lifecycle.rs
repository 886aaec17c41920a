// libs/appointment-cell/src/services/lifecycle.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::entities::{Appointment, AppointmentStatus};
use shared_models::error::{ClinicError, ClinicResult};

/// Validate that a status transition is allowed.
///
/// Pending is never a valid target and Completed is terminal. Approved and
/// Rejected may be swapped freely until completion.
pub fn validate_status_transition(
    current_status: AppointmentStatus,
    new_status: AppointmentStatus,
) -> ClinicResult<()> {
    if new_status == AppointmentStatus::Pending {
        return Err(ClinicError::InvalidState(
            "Status can only be changed to approved, rejected or completed.".to_string(),
        ));
    }

    if current_status.is_terminal() {
        warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
        return Err(ClinicError::InvalidState(
            "Completed appointments cannot change status.".to_string(),
        ));
    }

    Ok(())
}

/// Appointments can only be booked strictly in the future.
pub fn validate_appointment_timing(
    scheduled_at: DateTime<Utc>,
    current_time: DateTime<Utc>,
) -> ClinicResult<()> {
    if scheduled_at <= current_time {
        return Err(ClinicError::InvalidState(
            "Appointment time must be in the future.".to_string(),
        ));
    }
    Ok(())
}

pub struct AppointmentLifecycleService {
    store: Arc<dyn ClinicStore>,
}

impl AppointmentLifecycleService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
    ) -> ClinicResult<Appointment> {
        // Read, check and write under one transaction so a terminal status is never overwritten.
        let tx = self.store.begin().await?;
        let mut appointment = tx
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Appointment"))?;

        debug!("Validating status transition from {} to {}", appointment.status, new_status);
        validate_status_transition(appointment.status, new_status)?;

        appointment.status = new_status;
        if new_status == AppointmentStatus::Completed {
            appointment.completed_at = Some(Utc::now());
        }

        // Re-approving a rejected appointment can collide with a newer booking;
        // the store reports that as a conflict.
        tx.update_appointment(appointment.clone()).await?;
        tx.commit().await?;

        info!("Appointment {} is now {}", appointment.id, appointment.status);
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Approved,
        AppointmentStatus::Rejected,
        AppointmentStatus::Completed,
    ];

    #[test]
    fn test_completed_is_terminal_for_every_target() {
        for target in ALL {
            assert!(validate_status_transition(AppointmentStatus::Completed, target).is_err());
        }
    }

    #[test]
    fn test_pending_is_never_a_target() {
        for current in ALL {
            assert!(validate_status_transition(current, AppointmentStatus::Pending).is_err());
        }
    }

    #[test]
    fn test_approved_and_rejected_are_interchangeable() {
        assert!(validate_status_transition(AppointmentStatus::Approved, AppointmentStatus::Rejected).is_ok());
        assert!(validate_status_transition(AppointmentStatus::Rejected, AppointmentStatus::Approved).is_ok());
        assert!(validate_status_transition(AppointmentStatus::Pending, AppointmentStatus::Completed).is_ok());
    }

    #[test]
    fn test_timing_must_be_strictly_future() {
        let now = Utc::now();
        assert!(validate_appointment_timing(now, now).is_err());
        assert!(validate_appointment_timing(now - Duration::minutes(1), now).is_err());
        assert!(validate_appointment_timing(now + Duration::seconds(1), now).is_ok());
    }
}
