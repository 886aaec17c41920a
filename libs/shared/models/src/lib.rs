pub mod entities;
pub mod error;

pub use entities::*;
pub use error::{AppError, ClinicError, ClinicResult};
