use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared_models::entities::{
    Appointment, Consultation, Doctor, Invoice, InvoiceItem, Medicine, Patient, Prescription,
    PrescriptionItem,
};
use shared_models::error::ClinicError;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A uniqueness constraint held by the store was violated.
    #[error("{0}")]
    Conflict(String),

    /// An update or delete targeted a row that does not exist.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for ClinicError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ClinicError::Conflict(msg),
            StoreError::NotFound { entity, .. } => ClinicError::not_found(entity),
            StoreError::Unavailable(msg) => ClinicError::Store(msg),
        }
    }
}

/// CRUD and query contract over the clinic's records.
///
/// Relationships are never traversed implicitly: callers look related rows up
/// through the explicit query methods below. Query results carry no ordering
/// guarantee.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // Patients
    async fn get_patient(&self, id: Uuid) -> StoreResult<Option<Patient>>;
    async fn find_patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>>;
    async fn list_patients(&self) -> StoreResult<Vec<Patient>>;
    async fn insert_patient(&self, patient: Patient) -> StoreResult<()>;
    async fn update_patient(&self, patient: Patient) -> StoreResult<()>;

    // Doctors
    async fn get_doctor(&self, id: Uuid) -> StoreResult<Option<Doctor>>;
    async fn list_doctors(&self) -> StoreResult<Vec<Doctor>>;
    async fn insert_doctor(&self, doctor: Doctor) -> StoreResult<()>;
    async fn update_doctor(&self, doctor: Doctor) -> StoreResult<()>;

    // Appointments
    async fn get_appointment(&self, id: Uuid) -> StoreResult<Option<Appointment>>;
    async fn appointments_for_doctor(&self, doctor_id: Uuid) -> StoreResult<Vec<Appointment>>;
    async fn appointments_for_patient(&self, patient_id: Uuid) -> StoreResult<Vec<Appointment>>;
    async fn appointments_at(
        &self,
        doctor_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> StoreResult<Vec<Appointment>>;
    /// Fails with [`StoreError::Conflict`] if the doctor already holds a
    /// non-rejected appointment at the same instant.
    async fn insert_appointment(&self, appointment: Appointment) -> StoreResult<()>;
    /// Same slot constraint as [`EntityStore::insert_appointment`].
    async fn update_appointment(&self, appointment: Appointment) -> StoreResult<()>;

    // Consultations
    async fn consultation_for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> StoreResult<Option<Consultation>>;
    /// Fails with [`StoreError::Conflict`] if the appointment already has one.
    async fn insert_consultation(&self, consultation: Consultation) -> StoreResult<()>;

    // Medicines
    async fn get_medicine(&self, id: Uuid) -> StoreResult<Option<Medicine>>;
    async fn list_medicines(&self) -> StoreResult<Vec<Medicine>>;
    async fn medicines_named(&self, name: &str) -> StoreResult<Vec<Medicine>>;
    async fn low_stock_medicines(&self) -> StoreResult<Vec<Medicine>>;
    async fn insert_medicine(&self, medicine: Medicine) -> StoreResult<()>;
    async fn update_medicine(&self, medicine: Medicine) -> StoreResult<()>;
    async fn delete_medicine(&self, id: Uuid) -> StoreResult<()>;

    // Prescriptions
    async fn get_prescription(&self, id: Uuid) -> StoreResult<Option<Prescription>>;
    async fn insert_prescription(&self, prescription: Prescription) -> StoreResult<()>;
    async fn prescription_items(&self, prescription_id: Uuid) -> StoreResult<Vec<PrescriptionItem>>;
    async fn prescription_items_for_medicine(
        &self,
        medicine_id: Uuid,
    ) -> StoreResult<Vec<PrescriptionItem>>;
    async fn insert_prescription_item(&self, item: PrescriptionItem) -> StoreResult<()>;

    // Invoices
    async fn get_invoice(&self, id: Uuid) -> StoreResult<Option<Invoice>>;
    async fn insert_invoice(&self, invoice: Invoice) -> StoreResult<()>;
    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<()>;
    async fn invoice_items(&self, invoice_id: Uuid) -> StoreResult<Vec<InvoiceItem>>;
    async fn insert_invoice_item(&self, item: InvoiceItem) -> StoreResult<()>;
}

/// A unit of work over the store. Writes become visible to other callers only
/// on [`StoreTransaction::commit`]; dropping the transaction rolls it back.
#[async_trait]
pub trait StoreTransaction: EntityStore {
    async fn commit(self: Box<Self>) -> StoreResult<()>;
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

#[async_trait]
pub trait ClinicStore: EntityStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>>;
}
