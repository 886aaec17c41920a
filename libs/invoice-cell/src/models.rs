use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::entities::{Invoice, InvoiceItem};
use shared_models::error::ClinicError;
use shared_utils::validation::{self, Validate};

/// Upper bound for a single line's unit price.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Upper bound for a single line's quantity.
pub const MAX_QUANTITY: i32 = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemRequest {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub items: Vec<InvoiceItemRequest>,
}

impl Validate for CreateInvoiceRequest {
    fn validate(&self) -> Result<(), ClinicError> {
        validation::not_empty("invoice item", &self.items)?;
        for item in &self.items {
            validation::require_text("description", &item.description, 200)?;
            validation::at_least("quantity", item.quantity, 1)?;
            if item.quantity > MAX_QUANTITY {
                return Err(ClinicError::Validation(format!(
                    "quantity must be at most {}.",
                    MAX_QUANTITY
                )));
            }
            validation::non_negative_amount("unit_price", item.unit_price)?;
            validation::amount_at_most("unit_price", item.unit_price, MAX_UNIT_PRICE)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceItemResponse {
    #[serde(flatten)]
    pub item: InvoiceItem,
    pub line_total: Decimal,
}

impl From<InvoiceItem> for InvoiceItemResponse {
    fn from(item: InvoiceItem) -> Self {
        Self {
            line_total: item.line_total(),
            item,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItemResponse>,
}
