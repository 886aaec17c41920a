use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ClinicResult<T> = Result<T, ClinicError>;

/// Domain failures raised by the clinic rules.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClinicError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient stock for {medicine}. Available: {available}, requested: {requested}.")]
    InsufficientStock {
        medicine: String,
        available: i32,
        requested: i32,
    },

    #[error("{0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl ClinicError {
    pub fn not_found(entity: &str) -> Self {
        ClinicError::NotFound(format!("{} not found.", entity))
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        match err {
            ClinicError::NotFound(msg) => AppError::NotFound(msg),
            ClinicError::Conflict(msg) => AppError::Conflict(msg),
            ClinicError::Validation(msg) => AppError::ValidationError(msg),
            ClinicError::Store(msg) => AppError::Internal(msg),
            other @ (ClinicError::InvalidState(_) | ClinicError::InsufficientStock { .. }) => {
                AppError::BadRequest(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        if status.is_client_error() {
            tracing::debug!("Request rejected: {}: {}", status, message);
        }

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ClinicError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_domain_errors_map_to_status_codes() {
        assert_eq!(status_of(ClinicError::not_found("Doctor")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ClinicError::InvalidState("nope".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ClinicError::Conflict("taken".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ClinicError::InsufficientStock {
                medicine: "Ibuprofen".to_string(),
                available: 1,
                requested: 2,
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ClinicError::Store("lock poisoned".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = ClinicError::InsufficientStock {
            medicine: "Ibuprofen".to_string(),
            available: 4,
            requested: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Ibuprofen. Available: 4, requested: 10."
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ClinicError::not_found("Patient").to_string(), "Patient not found.");
    }
}
