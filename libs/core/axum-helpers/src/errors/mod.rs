pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_config::Environment;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// One field-level validation failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Standard error envelope.
///
/// Every error response carries `success: false` and a human-readable
/// `message`. Validation failures additionally list the offending fields,
/// and in development the `error` field exposes the underlying cause.
///
/// # JSON Example
///
/// ```json
/// {
///   "success": false,
///   "message": "Errores de validación",
///   "errors": [{ "field": "stock", "message": "stock no puede ser negativo" }]
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
    /// Extra human-readable context, e.g. a referencing-record count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Underlying cause, exposed only in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    fn new(message: String) -> Self {
        Self {
            success: false,
            message,
            errors: None,
            details: None,
            error: None,
        }
    }
}

/// Application error type that converts into HTTP responses.
///
/// Domain errors map into these variants at the handler boundary; the
/// variants carry the client-facing message, while the log event keeps the
/// full cause.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    Uuid(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Bad Request: {message} ({detail})")]
    BadRequestWithDetail { message: String, detail: String },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Flatten `validator` errors into the wire-level field list.
fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            out.push(FieldError {
                field: field.to_string(),
                message,
            });
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                let mut body = ErrorResponse::new("Error interno del servidor".to_string());
                if Environment::from_env().is_development() {
                    body.error = Some(e.to_string());
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                (e.status(), ErrorResponse::new(e.body_text()))
            }
            AppError::Validation(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                let mut body = ErrorResponse::new("Errores de validación".to_string());
                body.errors = Some(field_errors(&e));
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::Uuid(e) => {
                tracing::warn!(
                    error_code = ErrorCode::InvalidUuid.code(),
                    "UUID error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("ID inválido".to_string()),
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg))
            }
            AppError::BadRequestWithDetail { message, detail } => {
                tracing::info!("Bad request: {} ({})", message, detail);
                let mut body = ErrorResponse::new(message);
                body.details = Some(detail);
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, ErrorResponse::new(msg))
            }
            AppError::Conflict(msg) => {
                tracing::info!(error_code = ErrorCode::Conflict.code(), "Conflict: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new(msg))
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!(
                    error_code = ErrorCode::UnprocessableEntity.code(),
                    "Unprocessable entity: {}",
                    msg
                );
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorResponse::new(msg))
            }
            AppError::Internal(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                let mut body = ErrorResponse::new("Error interno del servidor".to_string());
                if Environment::from_env().is_development() {
                    body.error = Some(msg);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(
                    error_code = ErrorCode::ServiceUnavailable.code(),
                    "Service unavailable: {}",
                    msg
                );
                (StatusCode::SERVICE_UNAVAILABLE, ErrorResponse::new(msg))
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(range(min = 0, message = "stock no puede ser negativo"))]
        stock: i32,
    }

    #[test]
    fn test_field_errors_carry_custom_message() {
        let probe = Probe { stock: -1 };
        let errs = probe.validate().unwrap_err();
        let fields = field_errors(&errs);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "stock");
        assert_eq!(fields[0].message, "stock no puede ser negativo");
    }

    #[tokio::test]
    async fn test_not_found_status_and_envelope() {
        let response = AppError::NotFound("Medicamento no encontrado".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Medicamento no encontrado");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let errs = Probe { stock: -5 }.validate().unwrap_err();
        let response = AppError::Validation(errs).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Errores de validación");
        assert_eq!(body["errors"][0]["field"], "stock");
    }

    #[tokio::test]
    async fn test_conflict_status() {
        let response = AppError::Conflict("Ya existe".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
