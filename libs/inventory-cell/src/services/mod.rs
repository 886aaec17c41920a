pub mod alerts;
pub mod inventory;

pub use alerts::{LoggingLowStockNotifier, LowStockAlerts, LowStockNotifier, WebhookLowStockNotifier};
pub use inventory::{apply_deduction, InventoryService};
