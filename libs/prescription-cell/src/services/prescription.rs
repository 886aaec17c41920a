use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use inventory_cell::apply_deduction;
use inventory_cell::services::LowStockAlerts;
use shared_database::{ClinicStore, StoreTransaction};
use shared_models::entities::{Medicine, Prescription, PrescriptionItem};
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::{
    CreatePrescriptionRequest, PrescriptionItemRequest, PrescriptionItemResponse,
    PrescriptionResponse,
};

pub struct PrescriptionService {
    store: Arc<dyn ClinicStore>,
    alerts: Arc<LowStockAlerts>,
}

impl PrescriptionService {
    pub fn new(state: &AppState) -> Self {
        Self::with_alerts(
            state.store.clone(),
            Arc::new(LowStockAlerts::from_config(&state.config)),
        )
    }

    pub fn with_alerts(store: Arc<dyn ClinicStore>, alerts: Arc<LowStockAlerts>) -> Self {
        Self { store, alerts }
    }

    /// Issues a prescription and dispenses every item from stock.
    ///
    /// The header, all items and all stock deductions are written in one
    /// store transaction: if any item fails, nothing is kept.
    #[instrument(skip(self, request), fields(appointment_id = %request.appointment_id))]
    pub async fn create_prescription(
        &self,
        request: CreatePrescriptionRequest,
    ) -> ClinicResult<PrescriptionResponse> {
        let appointment = self
            .store
            .get_appointment(request.appointment_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Appointment"))?;
        self.store
            .get_doctor(request.doctor_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Doctor"))?;
        self.store
            .get_patient(request.patient_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Patient"))?;

        if !appointment.status.allows_clinical_records() {
            return Err(ClinicError::InvalidState(format!(
                "Prescriptions can only be issued for approved or completed appointments (current status: {}).",
                appointment.status
            )));
        }

        if appointment.doctor_id != request.doctor_id || appointment.patient_id != request.patient_id {
            warn!("Prescription participants do not match appointment {}", appointment.id);
            return Err(ClinicError::InvalidState(
                "Doctor and patient must match the appointment.".to_string(),
            ));
        }

        if request.items.is_empty() {
            return Err(ClinicError::Validation(
                "At least one prescription item is required.".to_string(),
            ));
        }

        let prescription = Prescription {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            created_at: Utc::now(),
        };

        let tx = self.store.begin().await?;
        let written = write_prescription(&*tx, &prescription, &request.items).await;
        let (items, dispensed) = match written {
            Ok(written) => written,
            Err(e) => {
                warn!("Prescription {} rolled back: {}", prescription.id, e);
                if let Err(rollback_err) = tx.rollback().await {
                    error!("Rollback of prescription {} failed: {}", prescription.id, rollback_err);
                }
                return Err(e);
            }
        };
        tx.commit().await?;

        info!(
            "Prescription {} issued with {} items",
            prescription.id,
            items.len()
        );

        for medicine in dispensed.values() {
            self.alerts.check(medicine).await;
        }

        Ok(PrescriptionResponse { prescription, items })
    }

    pub async fn get_prescription(&self, prescription_id: Uuid) -> ClinicResult<PrescriptionResponse> {
        debug!("Fetching prescription {}", prescription_id);

        let prescription = self
            .store
            .get_prescription(prescription_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Prescription"))?;

        let mut items = Vec::new();
        for item in self.store.prescription_items(prescription_id).await? {
            let medicine = self
                .store
                .get_medicine(item.medicine_id)
                .await?
                .ok_or_else(|| ClinicError::not_found("Medicine"))?;
            items.push(PrescriptionItemResponse {
                item,
                medicine_name: medicine.name,
                remaining_stock: medicine.quantity,
            });
        }
        items.sort_by(|a, b| a.medicine_name.cmp(&b.medicine_name));

        Ok(PrescriptionResponse { prescription, items })
    }
}

/// Writes the header and items through `tx`, deducting stock per item in
/// request order. Returns the item responses and the final state of every
/// medicine touched.
async fn write_prescription(
    tx: &dyn StoreTransaction,
    prescription: &Prescription,
    requested: &[PrescriptionItemRequest],
) -> ClinicResult<(Vec<PrescriptionItemResponse>, HashMap<Uuid, Medicine>)> {
    tx.insert_prescription(prescription.clone()).await?;

    let mut items = Vec::with_capacity(requested.len());
    let mut dispensed = HashMap::new();

    for entry in requested {
        let medicine = apply_deduction(tx, entry.medicine_id, entry.quantity).await?;

        let item = PrescriptionItem {
            id: Uuid::new_v4(),
            prescription_id: prescription.id,
            medicine_id: medicine.id,
            dosage: entry.dosage.clone(),
            quantity: entry.quantity,
            instructions: entry.instructions.clone(),
        };
        tx.insert_prescription_item(item.clone()).await?;

        items.push(PrescriptionItemResponse {
            item,
            medicine_name: medicine.name.clone(),
            remaining_stock: medicine.quantity,
        });
        dispensed.insert(medicine.id, medicine);
    }

    Ok((items, dispensed))
}
