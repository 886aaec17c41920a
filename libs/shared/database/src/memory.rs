// libs/shared/database/src/memory.rs
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedRwLockWriteGuard, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_models::entities::{
    Appointment, Consultation, Doctor, Invoice, InvoiceItem, Medicine, Patient, Prescription,
    PrescriptionItem,
};

use crate::store::{ClinicStore, EntityStore, StoreError, StoreResult, StoreTransaction};

const SLOT_TAKEN: &str = "Doctor already has an appointment at this time.";

/// Row storage shared by [`InMemoryStore`] and [`InMemoryTransaction`].
#[derive(Debug, Clone, Default)]
pub struct Tables {
    patients: HashMap<Uuid, Patient>,
    doctors: HashMap<Uuid, Doctor>,
    appointments: HashMap<Uuid, Appointment>,
    consultations: HashMap<Uuid, Consultation>,
    medicines: HashMap<Uuid, Medicine>,
    prescriptions: HashMap<Uuid, Prescription>,
    prescription_items: HashMap<Uuid, PrescriptionItem>,
    invoices: HashMap<Uuid, Invoice>,
    invoice_items: HashMap<Uuid, InvoiceItem>,
}

impl Tables {
    fn slot_taken(&self, candidate: &Appointment) -> bool {
        candidate.status.holds_slot()
            && self.appointments.values().any(|existing| {
                existing.id != candidate.id
                    && existing.doctor_id == candidate.doctor_id
                    && existing.scheduled_at == candidate.scheduled_at
                    && existing.status.holds_slot()
            })
    }
}

fn insert_row<T>(table: &mut HashMap<Uuid, T>, entity: &'static str, id: Uuid, row: T) -> StoreResult<()> {
    if table.contains_key(&id) {
        return Err(StoreError::Conflict(format!("{} {} already exists", entity, id)));
    }
    table.insert(id, row);
    Ok(())
}

fn replace_row<T>(table: &mut HashMap<Uuid, T>, entity: &'static str, id: Uuid, row: T) -> StoreResult<()> {
    match table.get_mut(&id) {
        Some(existing) => {
            *existing = row;
            Ok(())
        }
        None => Err(StoreError::NotFound { entity, id }),
    }
}

/// Read/write access to [`Tables`]; every in-memory handle gets the
/// [`EntityStore`] implementation through this.
pub trait TableAccess: Send + Sync {
    fn read<R, F>(&self, f: F) -> impl Future<Output = StoreResult<R>> + Send
    where
        F: FnOnce(&Tables) -> R + Send,
        R: Send;

    fn write<R, F>(&self, f: F) -> impl Future<Output = StoreResult<R>> + Send
    where
        F: FnOnce(&mut Tables) -> StoreResult<R> + Send,
        R: Send;
}

// ==============================================================================
// AUTO-COMMIT STORE
// ==============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableAccess for InMemoryStore {
    fn read<R, F>(&self, f: F) -> impl Future<Output = StoreResult<R>> + Send
    where
        F: FnOnce(&Tables) -> R + Send,
        R: Send,
    {
        async move {
            let tables = self.tables.read().await;
            Ok(f(&tables))
        }
    }

    fn write<R, F>(&self, f: F) -> impl Future<Output = StoreResult<R>> + Send
    where
        F: FnOnce(&mut Tables) -> StoreResult<R> + Send,
        R: Send,
    {
        async move {
            let mut tables = self.tables.write().await;
            f(&mut tables)
        }
    }
}

#[async_trait]
impl ClinicStore for InMemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let guard = self.tables.clone().write_owned().await;
        let snapshot = Tables::clone(&guard);
        debug!("Transaction started");

        Ok(Box::new(InMemoryTransaction {
            tables: Mutex::new(guard),
            snapshot: Some(snapshot),
        }))
    }
}

// ==============================================================================
// TRANSACTION
// ==============================================================================

/// Holds the store's write lock until committed or dropped, so concurrent
/// callers never observe a partially applied unit of work.
pub struct InMemoryTransaction {
    tables: Mutex<OwnedRwLockWriteGuard<Tables>>,
    snapshot: Option<Tables>,
}

impl TableAccess for InMemoryTransaction {
    fn read<R, F>(&self, f: F) -> impl Future<Output = StoreResult<R>> + Send
    where
        F: FnOnce(&Tables) -> R + Send,
        R: Send,
    {
        async move {
            let tables = self.tables.lock().await;
            Ok(f(&tables))
        }
    }

    fn write<R, F>(&self, f: F) -> impl Future<Output = StoreResult<R>> + Send
    where
        F: FnOnce(&mut Tables) -> StoreResult<R> + Send,
        R: Send,
    {
        async move {
            let mut tables = self.tables.lock().await;
            f(&mut tables)
        }
    }
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let mut tx = self;
        tx.snapshot = None;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        // Drop restores the snapshot.
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!("Transaction rolled back");
            let guard = self.tables.get_mut();
            **guard = snapshot;
        }
    }
}

// ==============================================================================
// ENTITY STORE OVER TABLES
// ==============================================================================

#[async_trait]
impl<S: TableAccess> EntityStore for S {
    async fn get_patient(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        self.read(move |t| t.patients.get(&id).cloned()).await
    }

    async fn find_patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        self.read(move |t| {
            t.patients
                .values()
                .find(|p| p.email.eq_ignore_ascii_case(email))
                .cloned()
        })
        .await
    }

    async fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.read(|t| t.patients.values().cloned().collect()).await
    }

    async fn insert_patient(&self, patient: Patient) -> StoreResult<()> {
        self.write(move |t| insert_row(&mut t.patients, "Patient", patient.id, patient)).await
    }

    async fn update_patient(&self, patient: Patient) -> StoreResult<()> {
        self.write(move |t| replace_row(&mut t.patients, "Patient", patient.id, patient)).await
    }

    async fn get_doctor(&self, id: Uuid) -> StoreResult<Option<Doctor>> {
        self.read(move |t| t.doctors.get(&id).cloned()).await
    }

    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        self.read(|t| t.doctors.values().cloned().collect()).await
    }

    async fn insert_doctor(&self, doctor: Doctor) -> StoreResult<()> {
        self.write(move |t| insert_row(&mut t.doctors, "Doctor", doctor.id, doctor)).await
    }

    async fn update_doctor(&self, doctor: Doctor) -> StoreResult<()> {
        self.write(move |t| replace_row(&mut t.doctors, "Doctor", doctor.id, doctor)).await
    }

    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>> {
        self.read(move |t| t.appointments.get(&id).cloned()).await
    }

    async fn appointments_for_doctor(&self, doctor_id: Uuid) -> StoreResult<Vec<Appointment>> {
        self.read(move |t| {
            t.appointments
                .values()
                .filter(|a| a.doctor_id == doctor_id)
                .cloned()
                .collect()
        })
        .await
    }

    async fn appointments_for_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Appointment>> {
        self.read(move |t| {
            t.appointments
                .values()
                .filter(|a| a.patient_id == patient_id)
                .cloned()
                .collect()
        })
        .await
    }

    async fn appointments_at(
        &self,
        doctor_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> StoreResult<Vec<Appointment>> {
        self.read(move |t| {
            t.appointments
                .values()
                .filter(|a| a.doctor_id == doctor_id && a.scheduled_at == scheduled_at)
                .cloned()
                .collect()
        })
        .await
    }

    async fn insert_appointment(&self, appointment: Appointment) -> StoreResult<()> {
        self.write(move |t| {
            if t.slot_taken(&appointment) {
                return Err(StoreError::Conflict(SLOT_TAKEN.to_string()));
            }
            insert_row(&mut t.appointments, "Appointment", appointment.id, appointment)
        })
        .await
    }

    async fn update_appointment(&self, appointment: Appointment) -> StoreResult<()> {
        self.write(move |t| {
            if t.slot_taken(&appointment) {
                return Err(StoreError::Conflict(SLOT_TAKEN.to_string()));
            }
            replace_row(&mut t.appointments, "Appointment", appointment.id, appointment)
        })
        .await
    }

    async fn consultation_for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> StoreResult<Option<Consultation>> {
        self.read(move |t| {
            t.consultations
                .values()
                .find(|c| c.appointment_id == appointment_id)
                .cloned()
        })
        .await
    }

    async fn insert_consultation(&self, consultation: Consultation) -> StoreResult<()> {
        self.write(move |t| {
            let exists = t
                .consultations
                .values()
                .any(|c| c.appointment_id == consultation.appointment_id);
            if exists {
                return Err(StoreError::Conflict(
                    "Consultation already exists for this appointment.".to_string(),
                ));
            }
            insert_row(&mut t.consultations, "Consultation", consultation.id, consultation)
        })
        .await
    }

    async fn get_medicine(&self, id: Uuid) -> StoreResult<Option<Medicine>> {
        self.read(move |t| t.medicines.get(&id).cloned()).await
    }

    async fn list_medicines(&self) -> StoreResult<Vec<Medicine>> {
        self.read(|t| t.medicines.values().cloned().collect()).await
    }

    async fn medicines_named(&self, name: &str) -> StoreResult<Vec<Medicine>> {
        self.read(move |t| {
            t.medicines
                .values()
                .filter(|m| m.name == name)
                .cloned()
                .collect()
        })
        .await
    }

    async fn low_stock_medicines(&self) -> StoreResult<Vec<Medicine>> {
        self.read(|t| {
            t.medicines
                .values()
                .filter(|m| m.is_low_stock())
                .cloned()
                .collect()
        })
        .await
    }

    async fn insert_medicine(&self, medicine: Medicine) -> StoreResult<()> {
        self.write(move |t| insert_row(&mut t.medicines, "Medicine", medicine.id, medicine)).await
    }

    async fn update_medicine(&self, medicine: Medicine) -> StoreResult<()> {
        self.write(move |t| replace_row(&mut t.medicines, "Medicine", medicine.id, medicine)).await
    }

    async fn delete_medicine(&self, id: Uuid) -> StoreResult<()> {
        self.write(move |t| match t.medicines.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { entity: "Medicine", id }),
        })
        .await
    }

    async fn get_prescription(&self, id: Uuid) -> StoreResult<Option<Prescription>> {
        self.read(move |t| t.prescriptions.get(&id).cloned()).await
    }

    async fn insert_prescription(&self, prescription: Prescription) -> StoreResult<()> {
        self.write(move |t| {
            insert_row(&mut t.prescriptions, "Prescription", prescription.id, prescription)
        })
        .await
    }

    async fn prescription_items(&self, prescription_id: Uuid) -> StoreResult<Vec<PrescriptionItem>> {
        self.read(move |t| {
            t.prescription_items
                .values()
                .filter(|i| i.prescription_id == prescription_id)
                .cloned()
                .collect()
        })
        .await
    }

    async fn prescription_items_for_medicine(
        &self,
        medicine_id: Uuid,
    ) -> StoreResult<Vec<PrescriptionItem>> {
        self.read(move |t| {
            t.prescription_items
                .values()
                .filter(|i| i.medicine_id == medicine_id)
                .cloned()
                .collect()
        })
        .await
    }

    async fn insert_prescription_item(&self, item: PrescriptionItem) -> StoreResult<()> {
        self.write(move |t| insert_row(&mut t.prescription_items, "PrescriptionItem", item.id, item))
            .await
    }

    async fn get_invoice(&self, id: Uuid) -> StoreResult<Option<Invoice>> {
        self.read(move |t| t.invoices.get(&id).cloned()).await
    }

    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<()> {
        self.write(move |t| insert_row(&mut t.invoices, "Invoice", invoice.id, invoice)).await
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<()> {
        self.write(move |t| replace_row(&mut t.invoices, "Invoice", invoice.id, invoice)).await
    }

    async fn invoice_items(&self, invoice_id: Uuid) -> StoreResult<Vec<InvoiceItem>> {
        self.read(move |t| {
            t.invoice_items
                .values()
                .filter(|i| i.invoice_id == invoice_id)
                .cloned()
                .collect()
        })
        .await
    }

    async fn insert_invoice_item(&self, item: InvoiceItem) -> StoreResult<()> {
        self.write(move |t| insert_row(&mut t.invoice_items, "InvoiceItem", item.id, item)).await
    }
}
