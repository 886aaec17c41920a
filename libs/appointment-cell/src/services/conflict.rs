use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::error::{ClinicError, ClinicResult};

use crate::models::ConflictCheckResponse;

pub const SLOT_TAKEN: &str = "Doctor already has an appointment at this time.";

/// Double-booking check: a doctor's slot is an exact instant, held by any
/// appointment that is not rejected.
pub struct ConflictDetectionService {
    store: Arc<dyn ClinicStore>,
}

impl ConflictDetectionService {
    pub fn new(store: Arc<dyn ClinicStore>) -> Self {
        Self { store }
    }

    pub async fn check_conflicts(
        &self,
        doctor_id: Uuid,
        scheduled_at: DateTime<Utc>,
        exclude_appointment_id: Option<Uuid>,
    ) -> ClinicResult<ConflictCheckResponse> {
        debug!("Checking conflicts for doctor {} at {}", doctor_id, scheduled_at);

        let conflicting_appointments: Vec<Uuid> = self
            .store
            .appointments_at(doctor_id, scheduled_at)
            .await?
            .into_iter()
            .filter(|a| a.status.holds_slot() && Some(a.id) != exclude_appointment_id)
            .map(|a| a.id)
            .collect();

        let has_conflict = !conflicting_appointments.is_empty();
        if has_conflict {
            warn!(
                "Conflict detected for doctor {} - {} conflicting appointments",
                doctor_id,
                conflicting_appointments.len()
            );
        }

        Ok(ConflictCheckResponse {
            doctor_id,
            scheduled_at,
            has_conflict,
            conflicting_appointments,
        })
    }

    pub async fn ensure_slot_free(
        &self,
        doctor_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> ClinicResult<()> {
        if self.check_conflicts(doctor_id, scheduled_at, None).await?.has_conflict {
            return Err(ClinicError::Conflict(SLOT_TAKEN.to_string()));
        }
        Ok(())
    }
}
