pub mod memory;
pub mod store;

pub use memory::{InMemoryStore, InMemoryTransaction, TableAccess, Tables};
pub use store::{ClinicStore, EntityStore, StoreError, StoreResult, StoreTransaction};
