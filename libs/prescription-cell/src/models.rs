use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::entities::{Prescription, PrescriptionItem};
use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionItemRequest {
    pub medicine_id: Uuid,
    pub dosage: Option<String>,
    pub quantity: i32,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub appointment_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub items: Vec<PrescriptionItemRequest>,
}

impl Validate for CreatePrescriptionRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validation::not_empty("prescription item", &self.items)?;
        for item in &self.items {
            validation::at_least("quantity", item.quantity, 1)?;
            validation::optional_text("dosage", item.dosage.as_deref(), 200)?;
            validation::optional_text("instructions", item.instructions.as_deref(), 300)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionItemResponse {
    #[serde(flatten)]
    pub item: PrescriptionItem,
    pub medicine_name: String,
    /// Stock left once this item was dispensed, or the current stock when
    /// the prescription is read back later.
    pub remaining_stock: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionResponse {
    #[serde(flatten)]
    pub prescription: Prescription,
    pub items: Vec<PrescriptionItemResponse>,
}
