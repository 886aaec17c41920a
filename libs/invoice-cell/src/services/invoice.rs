use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::ClinicStore;
use shared_models::entities::{invoice_total, Invoice, InvoiceItem, InvoiceStatus};
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::{CreateInvoiceRequest, InvoiceItemResponse, InvoiceResponse};
use crate::services::document::InvoiceDocumentRenderer;

pub struct InvoiceService {
    store: Arc<dyn ClinicStore>,
    renderer: InvoiceDocumentRenderer,
}

impl InvoiceService {
    pub fn new(state: &AppState) -> Self {
        Self::with_renderer(state.store.clone(), InvoiceDocumentRenderer::new(&state.config))
    }

    pub fn with_renderer(store: Arc<dyn ClinicStore>, renderer: InvoiceDocumentRenderer) -> Self {
        Self { store, renderer }
    }

    #[instrument(skip(self, request), fields(appointment_id = %request.appointment_id))]
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> ClinicResult<InvoiceResponse> {
        let appointment = self
            .store
            .get_appointment(request.appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Appointment"))?;
        let patient = self
            .store
            .get_patient(request.patient_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Patient"))?;

        if appointment.patient_id != patient.id {
            warn!("Invoice patient {} does not match appointment {}", patient.id, appointment.id);
            return Err(ClinicError::InvalidState(
                "Patient does not match the appointment.".to_string(),
            ));
        }

        if request.items.is_empty() {
            return Err(ClinicError::Validation(
                "At least one invoice item is required.".to_string(),
            ));
        }

        let invoice_id = Uuid::new_v4();
        let items: Vec<InvoiceItem> = request
            .items
            .into_iter()
            .map(|item| InvoiceItem {
                id: Uuid::new_v4(),
                invoice_id,
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        let total_amount = invoice_total(&items).ok_or_else(|| {
            warn!("Invoice {} total overflowed", invoice_id);
            ClinicError::Validation("Invoice total is out of range.".to_string())
        })?;
        debug!("Invoice {} totals {}", invoice_id, total_amount);

        let mut invoice = Invoice {
            id: invoice_id,
            appointment_id: appointment.id,
            patient_id: patient.id,
            total_amount,
            status: InvoiceStatus::Unpaid,
            created_at: Utc::now(),
            paid_at: None,
            rendered_document: None,
        };
        invoice.rendered_document = Some(self.renderer.render(&invoice, &items, &patient.full_name));

        // Header and items become visible together.
        let tx = self.store.begin().await?;
        tx.insert_invoice(invoice.clone()).await?;
        for item in &items {
            tx.insert_invoice_item(item.clone()).await?;
        }
        tx.commit().await?;

        info!("Invoice {} created for appointment {}", invoice.id, appointment.id);

        Ok(InvoiceResponse {
            invoice,
            items: items.into_iter().map(InvoiceItemResponse::from).collect(),
        })
    }

    pub async fn get_invoice(&self, invoice_id: Uuid) -> ClinicResult<InvoiceResponse> {
        let invoice = self.load(invoice_id).await?;
        let items = self.store.invoice_items(invoice_id).await?;

        Ok(InvoiceResponse {
            invoice,
            items: items.into_iter().map(InvoiceItemResponse::from).collect(),
        })
    }

    /// Marks the invoice paid. Paying an already paid invoice re-stamps `paid_at`.
    #[instrument(skip(self))]
    pub async fn mark_paid(&self, invoice_id: Uuid) -> ClinicResult<Invoice> {
        let tx = self.store.begin().await?;
        let mut invoice = tx
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Invoice"))?;

        if invoice.status == InvoiceStatus::Paid {
            debug!("Invoice {} already paid, re-stamping", invoice_id);
        }

        invoice.status = InvoiceStatus::Paid;
        invoice.paid_at = Some(Utc::now());
        // The cached document still shows the old status.
        invoice.rendered_document = None;

        tx.update_invoice(invoice.clone()).await?;
        tx.commit().await?;
        info!("Invoice {} marked paid", invoice_id);

        Ok(invoice)
    }

    /// Returns the rendered document, rendering and caching it on first use.
    pub async fn get_document(&self, invoice_id: Uuid) -> ClinicResult<Vec<u8>> {
        if let Some(document) = self.load(invoice_id).await?.rendered_document {
            return Ok(document);
        }

        // Render and cache under one transaction so a concurrent payment is never overwritten.
        let tx = self.store.begin().await?;
        let mut invoice = tx
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Invoice"))?;
        if let Some(document) = invoice.rendered_document.take() {
            tx.commit().await?;
            return Ok(document);
        }

        debug!("Rendering document for invoice {}", invoice_id);
        let patient = tx
            .get_patient(invoice.patient_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Patient"))?;
        let items = tx.invoice_items(invoice_id).await?;

        let document = self.renderer.render(&invoice, &items, &patient.full_name);
        invoice.rendered_document = Some(document.clone());
        tx.update_invoice(invoice).await?;
        tx.commit().await?;

        Ok(document)
    }

    async fn load(&self, invoice_id: Uuid) -> ClinicResult<Invoice> {
        self.store
            .get_invoice(invoice_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Invoice"))
    }
}
