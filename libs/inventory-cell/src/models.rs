use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::entities::Medicine;
use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMedicineRequest {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub minimum_threshold: i32,
    pub unit: Option<String>,
    pub price_per_unit: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Full overwrite of a medicine's mutable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMedicineRequest {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub minimum_threshold: i32,
    pub unit: Option<String>,
    pub price_per_unit: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn validate_medicine_fields(
    name: &str,
    description: Option<&str>,
    quantity: i32,
    minimum_threshold: i32,
    unit: Option<&str>,
    price_per_unit: Decimal,
) -> Result<(), ClinicError> {
    validation::require_text("name", name, 180)?;
    validation::optional_text("description", description, 500)?;
    validation::optional_text("unit", unit, 40)?;
    validation::at_least("quantity", quantity, 0)?;
    validation::at_least("minimum_threshold", minimum_threshold, 0)?;
    validation::non_negative_amount("price_per_unit", price_per_unit)
}

impl Validate for CreateMedicineRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validate_medicine_fields(
            &self.name,
            self.description.as_deref(),
            self.quantity,
            self.minimum_threshold,
            self.unit.as_deref(),
            self.price_per_unit,
        )
    }
}

impl Validate for UpdateMedicineRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validate_medicine_fields(
            &self.name,
            self.description.as_deref(),
            self.quantity,
            self.minimum_threshold,
            self.unit.as_deref(),
            self.price_per_unit,
        )
    }
}

/// Payload handed to every [`crate::services::LowStockNotifier`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LowStockEvent {
    pub medicine_id: Uuid,
    pub name: String,
    pub quantity: i32,
    pub minimum_threshold: i32,
    pub detected_at: DateTime<Utc>,
}

impl From<&Medicine> for LowStockEvent {
    fn from(medicine: &Medicine) -> Self {
        Self {
            medicine_id: medicine.id,
            name: medicine.name.clone(),
            quantity: medicine.quantity,
            minimum_threshold: medicine.minimum_threshold,
            detected_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Webhook responded with status {0}")]
    Status(u16),
}
