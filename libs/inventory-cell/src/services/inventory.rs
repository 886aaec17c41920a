// libs/inventory-cell/src/services/inventory.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::{ClinicStore, EntityStore};
use shared_models::entities::Medicine;
use shared_models::error::{ClinicError, ClinicResult};
use shared_utils::AppState;

use crate::models::{CreateMedicineRequest, UpdateMedicineRequest};
use crate::services::alerts::LowStockAlerts;

/// Removes `quantity` units from a medicine's stock through `store`.
///
/// Works against the shared store or an open transaction; prescription
/// creation calls it once per item inside its unit of work. Low-stock
/// evaluation of the returned medicine is left to the caller.
pub async fn apply_deduction<S: EntityStore + ?Sized>(
    store: &S,
    medicine_id: Uuid,
    quantity: i32,
) -> ClinicResult<Medicine> {
    let mut medicine = store
        .get_medicine(medicine_id)
        .await?
        .ok_or_else(|| ClinicError::not_found("Medicine"))?;

    if quantity <= 0 {
        return Err(ClinicError::InvalidState(
            "Quantity to deduct must be greater than zero.".to_string(),
        ));
    }

    if medicine.quantity < quantity {
        warn!(
            "Insufficient stock for {}: available {}, requested {}",
            medicine.name, medicine.quantity, quantity
        );
        return Err(ClinicError::InsufficientStock {
            medicine: medicine.name,
            available: medicine.quantity,
            requested: quantity,
        });
    }

    medicine.quantity -= quantity;
    store.update_medicine(medicine.clone()).await?;

    debug!("Deducted {} of {}, {} left", quantity, medicine.name, medicine.quantity);
    Ok(medicine)
}

pub struct InventoryService {
    store: Arc<dyn ClinicStore>,
    alerts: Arc<LowStockAlerts>,
}

impl InventoryService {
    pub fn new(state: &AppState) -> Self {
        Self::with_alerts(
            state.store.clone(),
            Arc::new(LowStockAlerts::from_config(&state.config)),
        )
    }

    pub fn with_alerts(store: Arc<dyn ClinicStore>, alerts: Arc<LowStockAlerts>) -> Self {
        Self { store, alerts }
    }

    pub fn alerts(&self) -> &LowStockAlerts {
        &self.alerts
    }

    pub async fn list_medicines(&self) -> ClinicResult<Vec<Medicine>> {
        let mut medicines = self.store.list_medicines().await?;
        medicines.sort_by_key(|m| m.name.to_lowercase());
        Ok(medicines)
    }

    pub async fn get_medicine(&self, medicine_id: Uuid) -> ClinicResult<Medicine> {
        self.store
            .get_medicine(medicine_id)
            .await?
            .ok_or_else(|| ClinicError::not_found("Medicine"))
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_medicine(&self, request: CreateMedicineRequest) -> ClinicResult<Medicine> {
        debug!("Creating medicine");

        self.ensure_name_available(&request.name, None).await?;

        let medicine = Medicine {
            id: Uuid::new_v4(),
            name: request.name,
            description: request.description,
            quantity: request.quantity,
            minimum_threshold: request.minimum_threshold,
            unit: request.unit,
            price_per_unit: request.price_per_unit,
            is_active: request.is_active,
            created_at: Utc::now(),
        };

        self.store.insert_medicine(medicine.clone()).await?;
        info!("Medicine {} created with {} in stock", medicine.id, medicine.quantity);

        self.alerts.check(&medicine).await;
        Ok(medicine)
    }

    #[instrument(skip(self, request))]
    pub async fn update_medicine(
        &self,
        medicine_id: Uuid,
        request: UpdateMedicineRequest,
    ) -> ClinicResult<Medicine> {
        let existing = self.get_medicine(medicine_id).await?;

        if request.is_active {
            self.ensure_name_available(&request.name, Some(medicine_id)).await?;
        }

        let medicine = Medicine {
            name: request.name,
            description: request.description,
            quantity: request.quantity,
            minimum_threshold: request.minimum_threshold,
            unit: request.unit,
            price_per_unit: request.price_per_unit,
            is_active: request.is_active,
            ..existing
        };

        self.store.update_medicine(medicine.clone()).await?;
        info!("Medicine {} updated", medicine_id);

        self.alerts.check(&medicine).await;
        Ok(medicine)
    }

    /// Deletes a medicine that no prescription item refers to.
    #[instrument(skip(self))]
    pub async fn delete_medicine(&self, medicine_id: Uuid) -> ClinicResult<()> {
        let medicine = self.get_medicine(medicine_id).await?;

        let references = self.store.prescription_items_for_medicine(medicine_id).await?;
        if !references.is_empty() {
            warn!(
                "Refusing to delete {}: referenced by {} prescription items",
                medicine.name,
                references.len()
            );
            return Err(ClinicError::Conflict(format!(
                "{} is referenced by existing prescriptions. Deactivate it instead.",
                medicine.name
            )));
        }

        self.store.delete_medicine(medicine_id).await?;
        info!("Medicine {} deleted", medicine_id);
        Ok(())
    }

    /// Deducts stock in its own transaction so concurrent deductions cannot
    /// oversell.
    #[instrument(skip(self))]
    pub async fn deduct_stock(&self, medicine_id: Uuid, quantity: i32) -> ClinicResult<Medicine> {
        let tx = self.store.begin().await?;
        let medicine = apply_deduction(&*tx, medicine_id, quantity).await?;
        tx.commit().await?;

        self.alerts.check(&medicine).await;
        Ok(medicine)
    }

    pub async fn low_stock(&self) -> ClinicResult<Vec<Medicine>> {
        let mut medicines = self.store.low_stock_medicines().await?;
        medicines.sort_by_key(|m| m.name.to_lowercase());
        Ok(medicines)
    }

    async fn ensure_name_available(&self, name: &str, except: Option<Uuid>) -> ClinicResult<()> {
        let taken = self
            .store
            .medicines_named(name)
            .await?
            .iter()
            .any(|m| m.is_active && Some(m.id) != except);

        if taken {
            return Err(ClinicError::Conflict(format!(
                "An active medicine named {} already exists.",
                name
            )));
        }
        Ok(())
    }
}
