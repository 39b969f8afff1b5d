//! API error handling
//!
//! Domain rejections keep their stable code in the response body so callers
//! can branch on `error` without parsing `message`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use domain_account::AccountError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error")]
    Validation(Vec<String>),

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Account(error) => account_status(error),
        }
    }
}

fn account_status(error: &AccountError) -> StatusCode {
    match error {
        AccountError::ClientNotFound(_)
        | AccountError::ProductNotConfigured(_)
        | AccountError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        AccountError::DuplicateAccountNumber(_) => StatusCode::CONFLICT,
        AccountError::MaxAccountsExceeded { .. }
        | AccountError::InsufficientHolders { .. }
        | AccountError::InsufficientSigners { .. }
        | AccountError::AccountPrerequisiteMissing
        | AccountError::CardPrerequisiteMissing => StatusCode::UNPROCESSABLE_ENTITY,
        AccountError::TransientRemoteFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound(msg) => ErrorResponse {
                error: "not_found".to_string(),
                message: msg,
                class: None,
                details: None,
            },
            ApiError::BadRequest(msg) => ErrorResponse {
                error: "bad_request".to_string(),
                message: msg,
                class: None,
                details: None,
            },
            ApiError::Validation(details) => ErrorResponse {
                error: "validation_error".to_string(),
                message: "Request body failed validation".to_string(),
                class: None,
                details: Some(details),
            },
            ApiError::Account(error) => ErrorResponse {
                error: error.code().to_string(),
                message: error.to_string(),
                class: Some(error.class().as_str()),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details = Vec::new();
        collect_details("", &errors, &mut details);
        details.sort();
        ApiError::Validation(details)
    }
}

/// Flattens nested validation errors into `path: message` lines
fn collect_details(prefix: &str, errors: &ValidationErrors, details: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                details.extend(field_errors.iter().map(|error| match &error.message {
                    Some(message) => format!("{}: {}", path, message),
                    None => format!("{}: {}", path, error.code),
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_details(&path, inner, details),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_details(&format!("{}[{}]", path, index), inner, details);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{ClientIdentity, PortError};

    #[test]
    fn test_account_error_statuses() {
        assert_eq!(
            ApiError::from(AccountError::ClientNotFound(
                ClientIdentity::new("DNI", "10000001").unwrap()
            ))
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AccountError::DuplicateAccountNumber("191-1".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AccountError::InsufficientSigners { required: 1 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(AccountError::transient("count_cards", PortError::unavailable("card-registry")))
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
