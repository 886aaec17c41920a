use serde::{Deserialize, Serialize};

use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

// ==============================================================================
// DOCTOR REQUESTS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub full_name: String,
    pub specialization: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub full_name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

fn optional_email(value: Option<&str>) -> Result<(), ClinicError> {
    if let Some(email) = value {
        validation::max_length("email", email, 200)?;
        validation::email("email", email)?;
    }
    Ok(())
}

impl Validate for CreateDoctorRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validation::require_text("full_name", &self.full_name, 150)?;
        validation::require_text("specialization", &self.specialization, 120)?;
        optional_email(self.email.as_deref())?;
        validation::optional_text("phone_number", self.phone_number.as_deref(), 30)
    }
}

impl Validate for UpdateDoctorRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        if let Some(full_name) = &self.full_name {
            validation::require_text("full_name", full_name, 150)?;
        }
        if let Some(specialization) = &self.specialization {
            validation::require_text("specialization", specialization, 120)?;
        }
        optional_email(self.email.as_deref())?;
        validation::optional_text("phone_number", self.phone_number.as_deref(), 30)
    }
}
