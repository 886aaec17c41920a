use shared_config::AppConfig;
use shared_models::entities::{Invoice, InvoiceItem};

/// Renders the downloadable invoice document. The output is a plain-text
/// layout served under a PDF content type.
#[derive(Debug, Clone)]
pub struct InvoiceDocumentRenderer {
    clinic_name: String,
    currency: String,
}

impl InvoiceDocumentRenderer {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            clinic_name: config.clinic_name.clone(),
            currency: config.currency.clone(),
        }
    }

    pub fn render(&self, invoice: &Invoice, items: &[InvoiceItem], patient_name: &str) -> Vec<u8> {
        let mut lines = vec![
            self.clinic_name.clone(),
            "INVOICE".to_string(),
            String::new(),
            format!("Invoice Id: {}", invoice.id),
            format!("Appointment Id: {}", invoice.appointment_id),
            format!("Patient: {}", patient_name),
            format!("Status: {}", invoice.status),
            format!("Created: {}", invoice.created_at.to_rfc3339()),
        ];
        if let Some(paid_at) = invoice.paid_at {
            lines.push(format!("Paid: {}", paid_at.to_rfc3339()));
        }

        if !items.is_empty() {
            lines.push(String::new());
            lines.extend(items.iter().map(|item| {
                format!(
                    "{} x{} @ {:.2} = {:.2}",
                    item.description,
                    item.quantity,
                    item.unit_price,
                    item.line_total()
                )
            }));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} {:.2}", self.currency, invoice.total_amount));

        let mut document = lines.join("\n");
        document.push('\n');
        document.into_bytes()
    }
}
