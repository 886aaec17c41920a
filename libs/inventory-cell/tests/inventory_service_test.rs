use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use rust_decimal::Decimal;

use inventory_cell::models::{CreateMedicineRequest, LowStockEvent, NotifierError, UpdateMedicineRequest};
use inventory_cell::services::{LowStockAlerts, LowStockNotifier};
use inventory_cell::InventoryService;
use shared_database::{EntityStore, InMemoryStore};
use shared_models::entities::PrescriptionItem;
use shared_models::error::ClinicError;
use shared_utils::test_utils::seed_medicine;
use uuid::Uuid;

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<LowStockEvent>>,
}

impl RecordingNotifier {
    fn names(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(|e| e.name.clone()).collect()
    }
}

#[async_trait]
impl LowStockNotifier for RecordingNotifier {
    async fn notify(&self, event: &LowStockEvent) -> Result<(), NotifierError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct FailingNotifier;

#[async_trait]
impl LowStockNotifier for FailingNotifier {
    async fn notify(&self, _event: &LowStockEvent) -> Result<(), NotifierError> {
        Err(NotifierError::Status(503))
    }
}

fn setup() -> (Arc<InMemoryStore>, Arc<RecordingNotifier>, InventoryService) {
    let store = Arc::new(InMemoryStore::new());
    let recorder = Arc::new(RecordingNotifier::default());
    let notifiers: Vec<Arc<dyn LowStockNotifier>> = vec![recorder.clone()];
    let service = InventoryService::with_alerts(store.clone(), Arc::new(LowStockAlerts::new(notifiers)));
    (store, recorder, service)
}

fn create_request(name: &str, quantity: i32, minimum_threshold: i32) -> CreateMedicineRequest {
    CreateMedicineRequest {
        name: name.to_string(),
        description: Some("Broad-spectrum antibiotic".to_string()),
        quantity,
        minimum_threshold,
        unit: Some("capsule".to_string()),
        price_per_unit: Decimal::new(350, 2),
        is_active: true,
    }
}

#[tokio::test]
async fn test_deduct_stock_example() {
    let (store, recorder, service) = setup();
    let medicine = seed_medicine(&*store, "Ibuprofen 200mg", 10, 5).await;

    let after = service.deduct_stock(medicine.id, 6).await.unwrap();
    assert_eq!(after.quantity, 4);
    assert_eq!(recorder.names(), vec!["Ibuprofen 200mg".to_string()]);

    let err = service.deduct_stock(medicine.id, 10).await.unwrap_err();
    assert_matches!(
        err,
        ClinicError::InsufficientStock { available: 4, requested: 10, .. }
    );

    let stored = store.get_medicine(medicine.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 4);
}

#[tokio::test]
async fn test_deduct_stock_rejections() {
    let (store, recorder, service) = setup();
    let medicine = seed_medicine(&*store, "Cetirizine", 20, 2).await;

    assert_matches!(
        service.deduct_stock(Uuid::new_v4(), 1).await,
        Err(ClinicError::NotFound(_))
    );
    assert_matches!(
        service.deduct_stock(medicine.id, 0).await,
        Err(ClinicError::InvalidState(_))
    );
    assert_matches!(
        service.deduct_stock(medicine.id, -3).await,
        Err(ClinicError::InvalidState(_))
    );

    let after = service.deduct_stock(medicine.id, 5).await.unwrap();
    assert_eq!(after.quantity, 15);
    assert!(recorder.names().is_empty());
}

#[tokio::test]
async fn test_deduct_to_exact_threshold_notifies() {
    let (store, recorder, service) = setup();
    let medicine = seed_medicine(&*store, "Omeprazole", 8, 3).await;

    service.deduct_stock(medicine.id, 5).await.unwrap();
    assert_eq!(recorder.names().len(), 1);
}

#[tokio::test]
async fn test_create_rejects_duplicate_active_name() {
    let (_store, _recorder, service) = setup();
    service.create_medicine(create_request("Amoxicillin", 50, 10)).await.unwrap();

    let err = service
        .create_medicine(create_request("Amoxicillin", 5, 1))
        .await
        .unwrap_err();
    assert_matches!(err, ClinicError::Conflict(_));
}

#[tokio::test]
async fn test_create_allows_name_of_inactive_medicine() {
    let (_store, _recorder, service) = setup();
    let mut retired = create_request("Codeine", 0, 0);
    retired.is_active = false;
    service.create_medicine(retired).await.unwrap();

    assert!(service.create_medicine(create_request("Codeine", 30, 5)).await.is_ok());
}

#[tokio::test]
async fn test_create_at_threshold_notifies() {
    let (_store, recorder, service) = setup();
    service.create_medicine(create_request("Salbutamol", 2, 2)).await.unwrap();
    service.create_medicine(create_request("Loratadine", 40, 2)).await.unwrap();

    assert_eq!(recorder.names(), vec!["Salbutamol".to_string()]);
}

#[tokio::test]
async fn test_update_overwrites_fields_and_rechecks_stock() {
    let (_store, recorder, service) = setup();
    let medicine = service.create_medicine(create_request("Metformin", 100, 10)).await.unwrap();

    let updated = service
        .update_medicine(
            medicine.id,
            UpdateMedicineRequest {
                name: "Metformin 850mg".to_string(),
                description: None,
                quantity: 9,
                minimum_threshold: 10,
                unit: None,
                price_per_unit: Decimal::new(120, 2),
                is_active: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.id, medicine.id);
    assert_eq!(updated.created_at, medicine.created_at);
    assert_eq!(updated.name, "Metformin 850mg");
    assert_eq!(updated.description, None);
    assert_eq!(recorder.names(), vec!["Metformin 850mg".to_string()]);
}

#[tokio::test]
async fn test_update_missing_medicine() {
    let (_store, _recorder, service) = setup();
    let request = UpdateMedicineRequest {
        name: "Ghost".to_string(),
        description: None,
        quantity: 1,
        minimum_threshold: 0,
        unit: None,
        price_per_unit: Decimal::ONE,
        is_active: true,
    };
    assert_matches!(
        service.update_medicine(Uuid::new_v4(), request).await,
        Err(ClinicError::NotFound(_))
    );
}

#[tokio::test]
async fn test_delete_medicine() {
    let (store, _recorder, service) = setup();
    let medicine = seed_medicine(&*store, "Aspirin", 10, 1).await;

    service.delete_medicine(medicine.id).await.unwrap();
    assert_eq!(store.get_medicine(medicine.id).await.unwrap(), None);
    assert_matches!(
        service.delete_medicine(medicine.id).await,
        Err(ClinicError::NotFound(_))
    );
}

#[tokio::test]
async fn test_delete_refused_while_prescribed() {
    let (store, _recorder, service) = setup();
    let medicine = seed_medicine(&*store, "Warfarin", 10, 1).await;
    store
        .insert_prescription_item(PrescriptionItem {
            id: Uuid::new_v4(),
            prescription_id: Uuid::new_v4(),
            medicine_id: medicine.id,
            dosage: Some("2mg".to_string()),
            quantity: 1,
            instructions: None,
        })
        .await
        .unwrap();

    assert_matches!(
        service.delete_medicine(medicine.id).await,
        Err(ClinicError::Conflict(_))
    );
    assert!(store.get_medicine(medicine.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_low_stock_listing_is_stable() {
    let (store, _recorder, service) = setup();
    seed_medicine(&*store, "Zinc", 1, 5).await;
    seed_medicine(&*store, "Atenolol", 5, 5).await;
    seed_medicine(&*store, "Plenty", 500, 5).await;

    let first = service.low_stock().await.unwrap();
    let second = service.low_stock().await.unwrap();

    let names: Vec<_> = first.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Atenolol", "Zinc"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_operation() {
    let store = Arc::new(InMemoryStore::new());
    let recorder = Arc::new(RecordingNotifier::default());
    let notifiers: Vec<Arc<dyn LowStockNotifier>> = vec![Arc::new(FailingNotifier), recorder.clone()];
    let service = InventoryService::with_alerts(store.clone(), Arc::new(LowStockAlerts::new(notifiers)));
    let medicine = seed_medicine(&*store, "Insulin", 3, 2).await;

    let after = service.deduct_stock(medicine.id, 2).await.unwrap();
    assert_eq!(after.quantity, 1);
    assert_eq!(recorder.names().len(), 1);
}
