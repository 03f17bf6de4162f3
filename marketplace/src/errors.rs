// marketplace/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::mailer::MailError;
use crate::validation::FieldErrors;
use crate::web::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
  /// Malformed or missing input fields, keyed by field name.
  #[error("Validation Error: {0}")]
  Validation(FieldErrors),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  /// The caller is authenticated but does not own the resource (or lacks the role).
  #[error("Forbidden: {0}")]
  Forbidden(String),

  /// A domain rule was violated, e.g. too many images.
  #[error("Invalid Input: {0}")]
  InvalidInput(String),

  #[error("Authentication Failed: {0}")]
  Unauthorized(String),

  #[error("Store Error: {0}")]
  Store(#[from] StoreError),

  #[error("Email Delivery Error: {0}")]
  Delivery(#[from] MailError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Shorthand for a validation failure on a single field.
  pub fn field(field: &str, message: impl Into<String>) -> Self {
    AppError::Validation(FieldErrors::single(field, message))
  }
}

// Handlers can use `?` on anything returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StoreError>() {
      Ok(store_err) => AppError::Store(store_err),
      Err(other) => AppError::Internal(format!("{:#}", other)),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      AppError::Delivery(_) => StatusCode::BAD_GATEWAY,
      AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let body = match self {
      AppError::Validation(fields) => {
        tracing::warn!(application_error = %self, "Responding with validation error");
        ApiResponse::failure_with_data("Validation failed", fields)
      }
      AppError::NotFound(m)
      | AppError::Conflict(m)
      | AppError::Forbidden(m)
      | AppError::InvalidInput(m)
      | AppError::Unauthorized(m) => {
        tracing::warn!(application_error = %self, "Responding with client error");
        ApiResponse::failure(m.clone())
      }
      AppError::Delivery(_) => {
        tracing::error!(application_error = %self, "Responding with delivery error");
        ApiResponse::failure("Error sending email")
      }
      // Everything below is logged in full and answered without internals.
      AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => {
        tracing::error!(application_error = %self, "Responding with internal error");
        ApiResponse::failure("Internal server error")
      }
    };
    HttpResponse::build(status).json(body)
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[actix_web::test]
  async fn internal_errors_do_not_leak_detail() {
    let err = AppError::Internal("connection string postgres://secret".to_string());
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Internal server error");
    assert!(!String::from_utf8_lossy(&body).contains("secret"));
  }

  #[actix_web::test]
  async fn validation_errors_carry_field_map() {
    let err = AppError::field("name", "name is required");
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["name"][0], "name is required");
  }

  #[test]
  fn anyhow_wrapping_store_error_keeps_its_kind() {
    let wrapped = anyhow::Error::new(StoreError::UniqueViolation("products_vendor_name_key".into()));
    assert!(matches!(AppError::from(wrapped), AppError::Store(StoreError::UniqueViolation(_))));

    let other = anyhow::anyhow!("boom");
    assert!(matches!(AppError::from(other), AppError::Internal(_)));
  }
}
