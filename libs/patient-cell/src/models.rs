use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, Utc};

use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

fn birth_date(value: NaiveDate) -> Result<(), ClinicError> {
    if value > Utc::now().date_naive() {
        return Err(ClinicError::Validation(
            "date_of_birth cannot be in the future.".to_string(),
        ));
    }
    Ok(())
}

impl Validate for CreatePatientRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validation::require_text("full_name", &self.full_name, 150)?;
        validation::require_text("email", &self.email, 200)?;
        validation::email("email", &self.email)?;
        validation::optional_text("phone_number", self.phone_number.as_deref(), 30)?;
        birth_date(self.date_of_birth)
    }
}

impl Validate for UpdatePatientRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        if let Some(full_name) = &self.full_name {
            validation::require_text("full_name", full_name, 150)?;
        }
        if let Some(email) = &self.email {
            validation::require_text("email", email, 200)?;
            validation::email("email", email)?;
        }
        validation::optional_text("phone_number", self.phone_number.as_deref(), 30)?;
        if let Some(date_of_birth) = self.date_of_birth {
            birth_date(date_of_birth)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(email: &str) -> CreatePatientRequest {
        CreatePatientRequest {
            full_name: "Orla Murphy".to_string(),
            email: email.to_string(),
            phone_number: None,
            date_of_birth: NaiveDate::from_ymd_opt(1975, 3, 2).unwrap(),
        }
    }

    #[test]
    fn test_create_requires_valid_email() {
        assert!(create("orla@example.ie").validate().is_ok());
        assert!(create("").validate().is_err());
        assert!(create("orla.example.ie").validate().is_err());
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let mut request = create("orla@example.ie");
        request.date_of_birth = Utc::now().date_naive() + chrono::Duration::days(2);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_partial_update_checks_present_fields() {
        assert!(UpdatePatientRequest::default().validate().is_ok());

        let blank_name = UpdatePatientRequest {
            full_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());

        let long_phone = UpdatePatientRequest {
            phone_number: Some("0".repeat(31)),
            ..Default::default()
        };
        assert!(long_phone.validate().is_err());
    }
}
