// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::entities::AppointmentStatus;
use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl Validate for BookAppointmentRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validation::optional_text("reason", self.reason.as_deref(), 500)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

impl Validate for UpdateStatusRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        Ok(())
    }
}

// ==============================================================================
// CONFLICT CHECK
// ==============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ConflictCheckResponse {
    pub doctor_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub has_conflict: bool,
    pub conflicting_appointments: Vec<Uuid>,
}
