// libs/shared/utils/src/validation.rs
use std::sync::OnceLock;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use regex::Regex;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use shared_models::error::{AppError, ClinicError};

/// Field-level checks run on request bodies before any service is invoked.
pub trait Validate {
    fn validate(&self) -> Result<(), ClinicError>;
}

/// `Json<T>` that also runs [`Validate`]; both parse and validation failures
/// are rejected with 400.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!("Rejected request body: {}", rejection.body_text());
                AppError::BadRequest(rejection.body_text())
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

fn invalid(message: String) -> ClinicError {
    ClinicError::Validation(message)
}

pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), ClinicError> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{} is required.", field)));
    }
    max_length(field, value, max_len)
}

pub fn optional_text(field: &str, value: Option<&str>, max_len: usize) -> Result<(), ClinicError> {
    match value {
        Some(text) => max_length(field, text, max_len),
        None => Ok(()),
    }
}

pub fn max_length(field: &str, value: &str, max_len: usize) -> Result<(), ClinicError> {
    if value.chars().count() > max_len {
        return Err(invalid(format!(
            "{} must be at most {} characters.",
            field, max_len
        )));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<(), ClinicError> {
    if !email_pattern().is_match(value) {
        return Err(invalid(format!("{} must be a valid email address.", field)));
    }
    Ok(())
}

pub fn at_least(field: &str, value: i32, min: i32) -> Result<(), ClinicError> {
    if value < min {
        return Err(invalid(format!("{} must be at least {}.", field, min)));
    }
    Ok(())
}

pub fn non_negative_amount(field: &str, value: Decimal) -> Result<(), ClinicError> {
    if value < Decimal::ZERO {
        return Err(invalid(format!("{} must not be negative.", field)));
    }
    Ok(())
}

pub fn amount_at_most(field: &str, value: Decimal, max: Decimal) -> Result<(), ClinicError> {
    if value > max {
        return Err(invalid(format!("{} must be at most {}.", field, max)));
    }
    Ok(())
}

pub fn not_empty<T>(field: &str, values: &[T]) -> Result<(), ClinicError> {
    if values.is_empty() {
        return Err(invalid(format!("At least one {} is required.", field)));
    }
    Ok(())
}
