use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConsultationRequest {
    pub appointment_id: Uuid,
    pub diagnosis: Option<String>,
    pub observations: Option<String>,
    pub notes: Option<String>,
    pub test_recommendations: Option<String>,
}

impl Validate for CreateConsultationRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validation::optional_text("diagnosis", self.diagnosis.as_deref(), 500)?;
        validation::optional_text("observations", self.observations.as_deref(), 1000)?;
        validation::optional_text("notes", self.notes.as_deref(), 1000)?;
        validation::optional_text(
            "test_recommendations",
            self.test_recommendations.as_deref(),
            500,
        )
    }
}
